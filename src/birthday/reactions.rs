use rand::Rng;
use rand::seq::SliceRandom;

use crate::core::templates::ReactionSet;

pub const MIN_ADDITIONAL: usize = 5;
pub const MAX_ADDITIONAL: usize = 10;

/// Every favorite once, shuffled, followed by a shuffled sample of 5-10
/// additional reactions (fewer if fewer are configured).
pub fn select_reactions<R: Rng + ?Sized>(set: &ReactionSet, rng: &mut R) -> Vec<String> {
    let mut selected = unique(&set.favorites);
    selected.shuffle(rng);

    let mut additional: Vec<String> = unique(&set.additional)
        .into_iter()
        .filter(|r| !selected.contains(r))
        .collect();
    additional.shuffle(rng);

    let wanted = rng.gen_range(MIN_ADDITIONAL..=MAX_ADDITIONAL);
    additional.truncate(wanted.min(additional.len()));

    selected.extend(additional);
    selected
}

fn unique(items: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !item.is_empty() && !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}
