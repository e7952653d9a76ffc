use soroban_sdk::contracttype;

/// Which bitmap index a word belongs to
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Census {
    /// Boundary ticks bookmarked by the orchestration layer
    Ticks,
    /// Knockout pivots on the bid side
    Bids,
    /// Knockout pivots on the ask side
    Asks,
}

/// A 256-bit bitmap word stored as two u128 halves.
/// Bit `i` lives in `lo` for i < 128 and in `hi` for i >= 128.
#[contracttype]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BitWord {
    pub lo: u128,
    pub hi: u128,
}

impl BitWord {
    pub const EMPTY: BitWord = BitWord { lo: 0, hi: 0 };

    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lo == 0 && self.hi == 0
    }

    pub fn is_set(&self, bit: u8) -> bool {
        if bit < 128 {
            self.lo & (1u128 << bit) != 0
        } else {
            self.hi & (1u128 << (bit - 128)) != 0
        }
    }

    /// Return a copy with `bit` set
    pub fn with(self, bit: u8) -> Self {
        let mut word = self;
        if bit < 128 {
            word.lo |= 1u128 << bit;
        } else {
            word.hi |= 1u128 << (bit - 128);
        }
        word
    }

    /// Return a copy with `bit` cleared
    pub fn without(self, bit: u8) -> Self {
        let mut word = self;
        if bit < 128 {
            word.lo &= !(1u128 << bit);
        } else {
            word.hi &= !(1u128 << (bit - 128));
        }
        word
    }

    /// Highest set bit at or below `bit`
    pub fn highest_at_or_below(&self, bit: u8) -> Option<u8> {
        if bit >= 128 {
            let hi = self.hi & mask_at_or_below(bit - 128);
            if hi != 0 {
                return Some(128 + msb(hi));
            }
            if self.lo != 0 {
                return Some(msb(self.lo));
            }
            None
        } else {
            let lo = self.lo & mask_at_or_below(bit);
            if lo != 0 {
                Some(msb(lo))
            } else {
                None
            }
        }
    }

    /// Lowest set bit at or above `bit`
    pub fn lowest_at_or_above(&self, bit: u8) -> Option<u8> {
        if bit < 128 {
            let lo = self.lo & !mask_below(bit);
            if lo != 0 {
                return Some(lsb(lo));
            }
            if self.hi != 0 {
                return Some(128 + lsb(self.hi));
            }
            None
        } else {
            let hi = self.hi & !mask_below(bit - 128);
            if hi != 0 {
                Some(128 + lsb(hi))
            } else {
                None
            }
        }
    }

    /// Highest set bit strictly below `bit`
    pub fn highest_below(&self, bit: u8) -> Option<u8> {
        if bit == 0 {
            None
        } else {
            self.highest_at_or_below(bit - 1)
        }
    }

    /// Lowest set bit strictly above `bit`
    pub fn lowest_above(&self, bit: u8) -> Option<u8> {
        if bit == u8::MAX {
            None
        } else {
            self.lowest_at_or_above(bit + 1)
        }
    }

    pub fn highest(&self) -> Option<u8> {
        self.highest_at_or_below(u8::MAX)
    }

    pub fn lowest(&self) -> Option<u8> {
        self.lowest_at_or_above(0)
    }
}

// Bits [0, bit] of a u128 half; bit < 128
fn mask_at_or_below(bit: u8) -> u128 {
    if bit >= 127 {
        u128::MAX
    } else {
        (1u128 << (bit + 1)) - 1
    }
}

// Bits [0, bit) of a u128 half; bit < 128
fn mask_below(bit: u8) -> u128 {
    (1u128 << bit) - 1
}

fn msb(x: u128) -> u8 {
    (127 - x.leading_zeros()) as u8
}

fn lsb(x: u128) -> u8 {
    x.trailing_zeros() as u8
}
