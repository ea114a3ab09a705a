//! Random source trait: the one seam for intentional variety.
//!
//! The composer never calls a random number generator directly. Tests inject
//! a source that always picks the first option and never fires optional
//! embellishments, which makes every reply deterministic.

pub trait RandomSource: Send {
    /// Pick an index in `0..len`. Callers never pass `len == 0`.
    fn pick(&mut self, len: usize) -> usize;

    /// Return `true` with probability `p`.
    fn chance(&mut self, p: f64) -> bool;
}
