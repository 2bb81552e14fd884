use std::collections::HashSet;

use birthday_bot::birthday::reactions::{MAX_ADDITIONAL, MIN_ADDITIONAL, select_reactions};
use birthday_bot::core::templates::ReactionSet;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn set(favorites: &[&str], additional: &[&str]) -> ReactionSet {
    ReactionSet {
        favorites: favorites.iter().map(|r| (*r).to_string()).collect(),
        additional: additional.iter().map(|r| (*r).to_string()).collect(),
    }
}

fn many(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{prefix}{i}")).collect()
}

#[test]
fn every_favorite_comes_first() {
    let reactions = set(&["tada", "cake"], &["gift", "star"]);

    for seed in 0..20 {
        let selected = select_reactions(&reactions, &mut StdRng::seed_from_u64(seed));
        let head: HashSet<&str> = selected[..2].iter().map(String::as_str).collect();
        assert_eq!(head, HashSet::from(["tada", "cake"]));
        assert_eq!(selected.len(), 4);
    }
}

#[test]
fn additional_sample_stays_within_bounds() {
    let reactions = ReactionSet {
        favorites: many("fav", 3),
        additional: many("extra", 30),
    };

    for seed in 0..50 {
        let selected = select_reactions(&reactions, &mut StdRng::seed_from_u64(seed));
        let extras = selected.len() - 3;
        assert!((MIN_ADDITIONAL..=MAX_ADDITIONAL).contains(&extras), "{extras} extras");
    }
}

#[test]
fn never_repeats_a_reaction() {
    let reactions = set(&["tada", "tada", "cake"], &["cake", "gift", "gift", "tada", "star"]);

    for seed in 0..20 {
        let selected = select_reactions(&reactions, &mut StdRng::seed_from_u64(seed));
        let unique: HashSet<&String> = selected.iter().collect();
        assert_eq!(unique.len(), selected.len());
        assert_eq!(selected.len(), 4);
    }
}

#[test]
fn empty_lists_yield_nothing() {
    let selected = select_reactions(&ReactionSet::default(), &mut StdRng::seed_from_u64(0));
    assert!(selected.is_empty());

    let selected = select_reactions(&set(&[], &["gift"]), &mut StdRng::seed_from_u64(0));
    assert_eq!(selected, vec!["gift"]);
}

#[test]
fn same_seed_same_selection() {
    let reactions = ReactionSet {
        favorites: many("fav", 4),
        additional: many("extra", 20),
    };
    assert_eq!(
        select_reactions(&reactions, &mut StdRng::seed_from_u64(9)),
        select_reactions(&reactions, &mut StdRng::seed_from_u64(9))
    );
}
