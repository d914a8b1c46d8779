//! Source of uniform noise for jitter and color perturbation.

use rand::{
    rngs::{StdRng, ThreadRng},
    Rng, SeedableRng,
};

pub trait RandomSource {
    /// Returns a uniformly distributed value in `[0, 1)`.
    fn next_float(&mut self) -> f64;

    /// Uniform value in `[-amount, amount)`.
    #[inline]
    fn uniform(&mut self, amount: f64) -> f64 {
        (self.next_float() * 2.0 - 1.0) * amount
    }

    /// Uniform integer in `[-amount, amount]`, both ends inclusive.
    #[inline]
    fn uniform_int(&mut self, amount: u32) -> i64 {
        let amount = i64::from(amount);
        let offset = (self.next_float() * (2 * amount + 1) as f64).floor() as i64;

        offset - amount
    }
}

/// Adapts any `rand` generator.
#[derive(Debug)]
pub struct Entropy<R>(R);

impl Entropy<ThreadRng> {
    /// Unseeded, so every run yields a different background.
    pub fn thread() -> Self {
        Entropy(rand::thread_rng())
    }
}

impl Entropy<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Entropy(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for Entropy<R> {
    #[inline]
    fn next_float(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

/// Always yields the same value.
#[cfg(test)]
#[derive(Copy, Clone, Debug)]
pub struct Constant(pub f64);

#[cfg(test)]
impl RandomSource for Constant {
    fn next_float(&mut self) -> f64 {
        self.0
    }
}

/// Cycles through the given values.
#[cfg(test)]
#[derive(Clone, Debug)]
pub struct Sequence {
    values: Vec<f64>,
    next: usize,
}

#[cfg(test)]
impl Sequence {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, next: 0 }
    }
}

#[cfg(test)]
impl RandomSource for Sequence {
    fn next_float(&mut self) -> f64 {
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }
}

#[test]
fn uniform_int_covers_inclusive_range() {
    assert_eq!(-3, Constant(0.0).uniform_int(3));
    assert_eq!(0, Constant(0.5).uniform_int(3));
    assert_eq!(3, Constant(0.999_999).uniform_int(3));
    assert_eq!(0, Constant(0.7).uniform_int(0));
}

#[test]
fn uniform_int_spans_the_whole_u32_range() {
    let max = i64::from(u32::MAX);

    assert_eq!(-3_000_000_000, Constant(0.0).uniform_int(3_000_000_000));
    assert_eq!(-max, Constant(0.0).uniform_int(u32::MAX));
    assert!(Constant(0.999_999_999).uniform_int(u32::MAX) > i64::from(i32::MAX));
}

#[test]
fn uniform_is_centered() {
    assert_eq!(-4.0, Constant(0.0).uniform(4.0));
    assert_eq!(0.0, Constant(0.5).uniform(4.0));
    assert_eq!(2.0, Constant(0.75).uniform(4.0));
}

#[test]
fn sequence_cycles() {
    let mut rng = Sequence::new(vec![0.1, 0.2]);

    assert_eq!(0.1, rng.next_float());
    assert_eq!(0.2, rng.next_float());
    assert_eq!(0.1, rng.next_float());
}

#[test]
fn seeded_entropy_is_reproducible() {
    let mut a = Entropy::seeded(7);
    let mut b = Entropy::seeded(7);

    for _ in 0..16 {
        let v = a.next_float();
        assert_eq!(v, b.next_float());
        assert!(v >= 0.0 && v < 1.0);
    }
}
