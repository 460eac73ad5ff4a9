//! Die sources.
//!
//! Every roll in the engine draws its faces from a [`DieSource`]. Production
//! code uses [`RngDieSource`] over a seeded PRNG; tests use [`ScriptedDice`]
//! to pin exact faces.

pub mod rng;
pub mod scripted;

pub use rng::RngDieSource;
pub use scripted::ScriptedDice;

/// The number of faces on the dice used by pool rolls and initiative.
pub const D10: u32 = 10;

/// A source of uniformly distributed die faces.
pub trait DieSource {
    /// Roll `count` independent dice with `faces` sides each.
    ///
    /// Every value is in `1..=faces`.
    fn roll(&mut self, count: u32, faces: u32) -> Vec<u32>;

    /// Roll a single die with `faces` sides.
    fn roll_one(&mut self, faces: u32) -> u32 {
        self.roll(1, faces).first().copied().unwrap_or(1)
    }
}

impl<D: DieSource + ?Sized> DieSource for &mut D {
    fn roll(&mut self, count: u32, faces: u32) -> Vec<u32> {
        (**self).roll(count, faces)
    }
}

impl<D: DieSource + ?Sized> DieSource for Box<D> {
    fn roll(&mut self, count: u32, faces: u32) -> Vec<u32> {
        (**self).roll(count, faces)
    }
}
