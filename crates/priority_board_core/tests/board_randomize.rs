use priority_board_core::{
    randomize, randomize_with_thread_rng, BoardState, Item, ItemId, ListKind,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

const TRIALS: usize = 4_000;

#[test]
fn randomize_splits_starter_board_in_half() {
    let state = BoardState::starter();
    let mut rng = StdRng::seed_from_u64(7);

    let next = randomize(&state, &mut rng);

    assert_eq!(next.prioritized.len(), 10);
    assert_eq!(next.unprioritized.len(), 10);
    assert_eq!(next.version, state.version);
    next.check_invariants().unwrap();
}

#[test]
fn randomize_floors_half_for_odd_counts() {
    let items: Vec<Item> = (1..=5)
        .map(|n| Item::with_id(ItemId::new(n.to_string()), format!("item {n}"), "", 1))
        .collect();
    let state = BoardState::new(items[..2].to_vec(), items[2..].to_vec());
    let mut rng = StdRng::seed_from_u64(11);

    let next = randomize(&state, &mut rng);

    assert_eq!(next.prioritized.len(), 2);
    assert_eq!(next.unprioritized.len(), 3);
}

#[test]
fn randomize_handles_tiny_boards() {
    let mut rng = StdRng::seed_from_u64(3);

    let empty = randomize(&BoardState::empty(), &mut rng);
    assert!(empty.is_empty());

    let single = BoardState::new(
        vec![Item::with_id(ItemId::new("only"), "Only", "", 1)],
        Vec::new(),
    );
    let next = randomize(&single, &mut rng);
    assert!(next.prioritized.is_empty());
    assert_eq!(next.unprioritized.len(), 1);
}

#[test]
fn randomize_keeps_every_item_unchanged() {
    let state = BoardState::starter();

    let next = randomize_with_thread_rng(&state);

    let mut before: Vec<&Item> = state.items().collect();
    let mut after: Vec<&Item> = next.items().collect();
    before.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
    after.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
    assert_eq!(before, after);
}

#[test]
fn randomize_is_deterministic_for_a_seed() {
    let state = BoardState::starter();

    let first = randomize(&state, &mut StdRng::seed_from_u64(42));
    let second = randomize(&state, &mut StdRng::seed_from_u64(42));

    assert_eq!(first, second);
    assert!(!first.shares_list_with(&state, ListKind::Unprioritized));
}

#[test]
fn randomize_gives_every_item_a_fair_chance() {
    let state = BoardState::starter();
    let total = state.len();
    let mut rng = StdRng::seed_from_u64(0xb0a2d);
    let mut prioritized_hits: HashMap<String, usize> = HashMap::new();
    let mut first_hits: HashMap<String, usize> = HashMap::new();

    for _ in 0..TRIALS {
        let next = randomize(&state, &mut rng);
        for item in next.prioritized.iter() {
            *prioritized_hits.entry(item.id.to_string()).or_default() += 1;
        }
        *first_hits
            .entry(next.prioritized[0].id.to_string())
            .or_default() += 1;
    }

    for item in state.items() {
        let id = item.id.to_string();
        let in_ranking = prioritized_hits.get(&id).copied().unwrap_or(0) as f64 / TRIALS as f64;
        assert!(
            (in_ranking - 0.5).abs() < 0.05,
            "item {id} ranked in {in_ranking:.3} of trials"
        );

        let at_top = first_hits.get(&id).copied().unwrap_or(0) as f64 / TRIALS as f64;
        let expected = 1.0 / total as f64;
        assert!(
            (at_top - expected).abs() < 0.025,
            "item {id} ranked first in {at_top:.3} of trials"
        );
    }
}
