//! Random picks from the loaded collection ("what should I play next?").

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<T> {
    pub count: usize,
    pub selected: Option<T>,
}

/// Uniformly random element of `items`, `None` when empty.
pub fn pick_random<T>(items: &[T]) -> Option<&T> {
    pick_random_with(items, &mut rand::rng())
}

pub fn pick_random_with<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> Option<&'a T> {
    items.choose(rng)
}

/// Collection size together with one random pick.
pub fn select_with_count<T: Clone>(items: &[T]) -> Selection<T> {
    Selection {
        count: items.len(),
        selected: pick_random(items).cloned(),
    }
}

/// Shuffled copy of `items`.
pub fn shuffled<T: Clone>(items: &[T]) -> Vec<T> {
    let mut items = items.to_vec();
    items.shuffle(&mut rand::rng());
    items
}
