//! Piece source - deterministic pair generator with a NEXT preview
//!
//! Colors come from a [`ColorBag`]; special kinds are rolled per cell from a
//! separate RNG stream so changing the rate table never changes the colors.

use crate::rng::{ColorBag, SimpleRng};
use crate::special::SpecialRates;
use crate::types::{CellColor, SpecialKind, NEXT_QUEUE_LEN};

/// Salt mixed into the seed of the special-roll stream
const SPECIAL_STREAM_SALT: u32 = 0x9E37_79B9;

/// Colors and special kinds of one pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairSpec {
    pub main: CellColor,
    pub sub: CellColor,
    pub main_special: Option<SpecialKind>,
    pub sub_special: Option<SpecialKind>,
}

impl PairSpec {
    pub const fn plain(main: CellColor, sub: CellColor) -> Self {
        Self {
            main,
            sub,
            main_special: None,
            sub_special: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PieceSource {
    bag: ColorBag,
    special_rng: SimpleRng,
    rates: SpecialRates,
    next: [PairSpec; NEXT_QUEUE_LEN],
}

impl PieceSource {
    pub fn new(seed: u32, rates: SpecialRates) -> Self {
        let mut source = Self {
            bag: ColorBag::new(seed),
            special_rng: SimpleRng::new(seed ^ SPECIAL_STREAM_SALT),
            rates,
            next: [PairSpec::plain(CellColor::Empty, CellColor::Empty); NEXT_QUEUE_LEN],
        };
        for i in 0..NEXT_QUEUE_LEN {
            source.next[i] = source.generate();
        }
        source
    }

    fn generate(&mut self) -> PairSpec {
        let main = self.bag.draw();
        let sub = self.bag.draw();
        PairSpec {
            main,
            sub,
            main_special: self.rates.roll(&mut self.special_rng),
            sub_special: self.rates.roll(&mut self.special_rng),
        }
    }

    /// Take the front of the queue and append a fresh pair
    pub fn next_pair(&mut self) -> PairSpec {
        let front = self.next[0];
        self.next.rotate_left(1);
        self.next[NEXT_QUEUE_LEN - 1] = self.generate();
        front
    }

    /// Upcoming pairs, front first
    pub fn peek(&self) -> &[PairSpec; NEXT_QUEUE_LEN] {
        &self.next
    }

    pub fn rates(&self) -> &SpecialRates {
        &self.rates
    }

    /// Change the rate table; pairs already queued keep their rolls
    pub fn set_rates(&mut self, rates: SpecialRates) {
        self.rates = rates;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_pairs() {
        let mut a = PieceSource::new(42, SpecialRates::new());
        let mut b = PieceSource::new(42, SpecialRates::new());
        for _ in 0..20 {
            assert_eq!(a.next_pair(), b.next_pair());
        }
    }

    #[test]
    fn test_queue_shifts_forward() {
        let mut source = PieceSource::new(7, SpecialRates::new());
        let preview = *source.peek();
        assert_eq!(source.next_pair(), preview[0]);
        assert_eq!(source.peek()[0], preview[1]);
    }

    #[test]
    fn test_colors_are_primary() {
        let mut source = PieceSource::new(3, SpecialRates::new());
        for _ in 0..25 {
            let pair = source.next_pair();
            assert!(CellColor::PRIMARY.contains(&pair.main));
            assert!(CellColor::PRIMARY.contains(&pair.sub));
            assert_eq!(pair.main_special, None);
        }
    }

    #[test]
    fn test_rates_do_not_change_colors() {
        let mut plain = PieceSource::new(9, SpecialRates::new());
        let mut special = PieceSource::new(9, SpecialRates::new().with(SpecialKind::Heal, 1.0));
        for _ in 0..10 {
            let a = plain.next_pair();
            let b = special.next_pair();
            assert_eq!((a.main, a.sub), (b.main, b.sub));
            assert_eq!(b.main_special, Some(SpecialKind::Heal));
            assert_eq!(b.sub_special, Some(SpecialKind::Heal));
        }
    }
}
