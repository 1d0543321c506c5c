//! Shareable text summary of the ranking.
//!
//! Pure formatting over the prioritized list; copying the text anywhere is
//! the caller's job.

use crate::model::item::Item;

/// Most ranked items listed in a summary; the rest are counted.
pub const SUMMARY_MAX_ITEMS: usize = 10;

/// Caller-supplied parts of the summary header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryOptions {
    /// Possessive prefix for the title, e.g. `"Milena's "`.
    pub owner: Option<String>,
    /// Date text shown under the title, already formatted by the caller.
    pub date_label: String,
}

/// Formats the ranking as numbered lines.
///
/// Returns `None` when nothing is ranked.
pub fn format_summary(prioritized: &[Item], options: &SummaryOptions) -> Option<String> {
    if prioritized.is_empty() {
        return None;
    }

    let shown = &prioritized[..prioritized.len().min(SUMMARY_MAX_ITEMS)];
    let owner = options.owner.as_deref().unwrap_or_default();
    let mut text = format!(
        "💫 {owner}Top {} Priorities\n📅 {}\n\n",
        shown.len(),
        options.date_label
    );

    let lines: Vec<String> = shown
        .iter()
        .enumerate()
        .map(|(index, item)| format!("{}. {} {}", index + 1, item.emoji, item.label))
        .collect();
    text.push_str(&lines.join("\n"));

    if prioritized.len() > SUMMARY_MAX_ITEMS {
        text.push_str(&format!(
            "\n\n...and {} more",
            prioritized.len() - SUMMARY_MAX_ITEMS
        ));
    }
    text.push_str("\n\n✨ Made with love");
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::{format_summary, SummaryOptions};
    use crate::model::item::{Item, ItemId};

    fn ranked(count: usize) -> Vec<Item> {
        (1..=count)
            .map(|n| Item::with_id(ItemId::new(n.to_string()), format!("Goal {n}"), "🎯", 1))
            .collect()
    }

    #[test]
    fn empty_ranking_has_no_summary() {
        assert_eq!(format_summary(&[], &SummaryOptions::default()), None);
    }

    #[test]
    fn short_ranking_lists_every_item() {
        let options = SummaryOptions {
            owner: None,
            date_label: "Oct 18".to_string(),
        };

        let text = format_summary(&ranked(2), &options).unwrap();

        assert_eq!(
            text,
            "💫 Top 2 Priorities\n📅 Oct 18\n\n1. 🎯 Goal 1\n2. 🎯 Goal 2\n\n✨ Made with love"
        );
    }

    #[test]
    fn long_ranking_is_truncated_with_remainder_count() {
        let text = format_summary(&ranked(13), &SummaryOptions::default()).unwrap();

        assert!(text.starts_with("💫 Top 10 Priorities"));
        assert!(text.contains("10. 🎯 Goal 10"));
        assert!(!text.contains("Goal 11"));
        assert!(text.contains("\n\n...and 3 more\n\n"));
    }
}
