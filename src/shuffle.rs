use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;

/// In-place Fisher–Yates shuffle driven by the caller's RNG
pub fn shuffle_in_place<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Shuffle a list and return it
pub fn shuffled<T, R: Rng + ?Sized>(mut items: Vec<T>, rng: &mut R) -> Vec<T> {
    shuffle_in_place(&mut items, rng);
    items
}

/// Pick up to `count` distractors from `candidates`, sampled without
/// replacement. Candidates equal to `correct` (ignoring case) and repeated
/// values are discarded first.
pub fn pick_distractors<R: Rng + ?Sized>(
    correct: &str,
    candidates: &[String],
    count: usize,
    rng: &mut R,
) -> Vec<String> {
    let pool: Vec<&String> = candidates
        .iter()
        .filter(|c| !c.eq_ignore_ascii_case(correct))
        .unique_by(|c| c.to_lowercase())
        .collect();

    pool.choose_multiple(rng, count)
        .map(|c| (*c).clone())
        .collect()
}

/// Build a multiple-choice option list: the correct value plus the given
/// distractors, shuffled. Returns the options and the correct index.
pub fn build_options<R: Rng + ?Sized>(
    correct: &str,
    distractors: Vec<String>,
    rng: &mut R,
) -> (Vec<String>, usize) {
    let mut options = distractors;
    options.push(correct.to_string());
    shuffle_in_place(&mut options, rng);
    let correct_index = options
        .iter()
        .position(|o| o == correct)
        .unwrap_or_default();
    (options, correct_index)
}
