#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Xorshift Entropy Source
=======================

The bend and pink-noise modes need a steady trickle of "random" bytes from
inside the timing path. A hardware entropy source is too slow and a real CSPRNG
is overkill, so we use Marsaglia's 32-bit xorshift:

    x ^= x << 13
    x ^= x >> 17
    x ^= x << 5

The shift triple (13, 17, 5) and the order of the three steps matter: any other
combination produces a different (and usually much shorter) cycle.

Seeding
-------

    state = RNG_MAGIC - uptime_ms      (wrapping)

followed by a fixed number of warm-up permutations to walk away from seeds
with few set bits. Two device generations exist:

    Stretched  101 warm-up rounds, one permutation per 4 byte draws
    Plain      100 warm-up rounds, one permutation per draw

Stretching
----------

A permutation yields 32 bits but callers mostly want a byte. The stretched
variant keeps a 2-bit counter and exposes the state one byte at a time:

    draw    counter before  permute?  counter after  byte exposed
    ----    --------------  --------  -------------  ------------
      1           0            yes          1          bits 8..16
      2           1            no           2          bits 16..24
      3           2            no           3          bits 24..32
      4           3            no           0          bits 0..8

Known weakness: zero is a fixed point of xorshift. A seed that lands on zero
produces an endless stream of zero bytes. Warm-up cannot escape it and nothing
here checks for it.
*/

/// Seed constant shared by both device variants.
pub const RNG_MAGIC: u32 = 75_380_540;

/// Which generation of the generator to run.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RngVariant {
    /// Counter-stretched byte draws, 101 warm-up rounds.
    #[default]
    Stretched,
    /// One permutation per draw, 100 warm-up rounds.
    Plain,
}

impl RngVariant {
    pub fn warmup_rounds(self) -> usize {
        match self {
            RngVariant::Stretched => 101,
            RngVariant::Plain => 100,
        }
    }
}

/// One xorshift32 step.
#[inline]
pub fn xorshift32(mut x: u32) -> u32 {
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    x
}

#[derive(Debug, Clone)]
pub struct EntropySource {
    state: u32,
    increment: u8, // 0..=3, byte lane of the next draw
    variant: RngVariant,
}

impl EntropySource {
    /// Seed from uptime and warm up.
    pub fn new(variant: RngVariant, uptime_ms: u64) -> Self {
        let mut source = Self::from_state(0, variant);
        source.reseed(uptime_ms);
        source
    }

    /// Start from a raw state with no warm-up.
    pub fn from_state(state: u32, variant: RngVariant) -> Self {
        Self {
            state,
            increment: 0,
            variant,
        }
    }

    /// Re-run the power-on seeding sequence.
    pub fn reseed(&mut self, uptime_ms: u64) {
        self.state = RNG_MAGIC.wrapping_sub(uptime_ms as u32);
        self.increment = 0;
        for _ in 0..self.variant.warmup_rounds() {
            self.permute();
        }
    }

    #[inline]
    fn permute(&mut self) {
        self.state = xorshift32(self.state);
    }

    /// Next pseudo-random byte.
    #[inline]
    pub fn next_byte(&mut self) -> u8 {
        match self.variant {
            RngVariant::Stretched => {
                if self.increment == 0 {
                    self.permute();
                }
                self.increment = (self.increment + 1) % 4;
                (self.state >> (u32::from(self.increment) * 8)) as u8
            }
            RngVariant::Plain => {
                self.permute();
                self.state as u8
            }
        }
    }

    /// Next pseudo-random word.
    ///
    /// The plain variant returns the permuted state directly; the stretched
    /// variant assembles four byte draws, little-endian.
    pub fn next_u32(&mut self) -> u32 {
        match self.variant {
            RngVariant::Stretched => u32::from_le_bytes([
                self.next_byte(),
                self.next_byte(),
                self.next_byte(),
                self.next_byte(),
            ]),
            RngVariant::Plain => {
                self.permute();
                self.state
            }
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    /// Byte lane the next stretched draw will expose after incrementing.
    pub fn byte_lane(&self) -> u8 {
        self.increment
    }

    pub fn variant(&self) -> RngVariant {
        self.variant
    }
}
