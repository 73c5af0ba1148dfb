//! Unbiased shuffling for answer order and fifty-fifty selection.

use rand::{Rng, seq::SliceRandom};

/// Return a uniformly shuffled copy of `items`, leaving the input untouched.
///
/// Draws from the thread-local generator, so consecutive calls share no state.
pub fn shuffled<T: Clone>(items: &[T]) -> Vec<T> {
    shuffled_with(items, &mut rand::rng())
}

/// Same as [`shuffled`] but with a caller-supplied generator.
pub fn shuffled_with<T, R>(items: &[T], rng: &mut R) -> Vec<T>
where
    T: Clone,
    R: Rng + ?Sized,
{
    let mut copy = items.to_vec();
    copy.shuffle(rng);
    copy
}
