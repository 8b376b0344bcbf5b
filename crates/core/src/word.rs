//! Fixed-width unsigned integers usable as buffer words and raw fields.

use std::fmt::Debug;

/// An unsigned integer that can be addressed bit by bit, LSB first.
///
/// Implemented for every primitive unsigned type. The bit cursors use it
/// both for the backing buffer's word type and for the destination type of
/// raw number reads and writes.
pub trait BitWord: Copy + Eq + Debug + Default {
    /// Width of the type in bits.
    const BITS: u32;

    /// The all-zero value.
    const ZERO: Self;

    /// Returns the bit at `index` (0 = least significant).
    fn bit(self, index: u32) -> bool;

    /// Returns `self` with the bit at `index` set.
    fn with_bit(self, index: u32) -> Self;
}

macro_rules! impl_bit_word {
    ($($t:ty),* $(,)?) => {
        $(
            impl BitWord for $t {
                const BITS: u32 = <$t>::BITS;
                const ZERO: Self = 0;

                #[inline]
                fn bit(self, index: u32) -> bool {
                    (self >> index) & 1 == 1
                }

                #[inline]
                fn with_bit(self, index: u32) -> Self {
                    self | (1 << index)
                }
            }
        )*
    };
}

impl_bit_word!(u8, u16, u32, u64, u128, usize);
