//! Bit-level cursors over caller-owned word buffers.
//!
//! [`BitWriter`] and [`BitReader`] pack bits LSB-first into fixed-width
//! words, consuming words in slice order. Neither owns or grows the buffer:
//! the caller allocates a worst-case sized, zero-initialized buffer up front
//! and afterwards asks the cursor how much of it was used
//! ([`get_element_size`](BitWriter::get_element_size),
//! [`get_bit_size`](BitWriter::get_bit_size)).
//!
//! # Bounds
//! The plain operations do not check how much room is left. Running past
//! the end of the slice panics on the slice index. Hosts that need a
//! recoverable error use the `try_*` variants, which check the remaining
//! space first and return [`BitIoError`].
//!
//! # Example
//! ```
//! use huffbits_core::bitio::{BitReader, BitWriter};
//!
//! let mut buf = [0u32; 2];
//! let mut writer = BitWriter::new(&mut buf);
//! writer.write_number_raw(0b101u8, 3);
//! writer.write_number_raw(0xABCDu16, 16);
//! assert_eq!(writer.get_bit_size(0), 19);
//! assert_eq!(writer.get_element_size(0), 1);
//!
//! let mut reader = BitReader::new(&buf);
//! assert_eq!(reader.read_number_raw::<u8>(3), 0b101);
//! assert_eq!(reader.read_number_raw::<u16>(16), 0xABCD);
//! ```

use crate::error::{BitIoError, HuffmanError, Result};
use crate::huffman::{HuffmanModel, HuffmanWriter};
use crate::word::BitWord;

/// Position of a cursor: a word index and a bit offset within that word.
///
/// The offset may equal the word width; the cursor moves to the next word
/// lazily, on the next access. A writer that has filled exactly one word
/// therefore still reports one element used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BitPosition {
    word: usize,
    bit: u32,
}

impl BitPosition {
    /// Position at the start of word `word`.
    pub fn at_word(word: usize) -> Self {
        Self { word, bit: 0 }
    }

    /// Index of the current word.
    pub fn word(&self) -> usize {
        self.word
    }

    /// Bit offset within the current word.
    pub fn bit(&self) -> u32 {
        self.bit
    }

    #[inline]
    fn load_word<W: BitWord>(&mut self) {
        if self.bit == W::BITS {
            self.word += 1;
            self.bit = 0;
        }
    }

    fn element_size(&self, start: usize) -> usize {
        self.word - start + usize::from(self.bit != 0)
    }

    fn bit_size<W: BitWord>(&self, start: usize) -> usize {
        (self.word - start) * W::BITS as usize + self.bit as usize
    }

    fn remaining_bits<W: BitWord>(&self, len: usize) -> usize {
        (len * W::BITS as usize).saturating_sub(self.bit_size::<W>(0))
    }
}

#[inline]
fn check_width<T: BitWord>(bits: u32) -> Result<()> {
    if bits > T::BITS {
        return Err(BitIoError::InvalidBitCount {
            bits,
            width: T::BITS,
        }
        .into());
    }
    Ok(())
}

#[inline]
fn check_room(requested: usize, available: usize) -> Result<()> {
    if requested > available {
        return Err(BitIoError::InsufficientBits {
            requested,
            available,
        }
        .into());
    }
    Ok(())
}

/// Writes bits LSB-first into a zero-initialized word buffer.
///
/// Writing only ever sets bits; a buffer that is not zeroed beforehand
/// keeps whatever ones it already held.
#[derive(Debug)]
pub struct BitWriter<'a, W: BitWord = u32> {
    data: &'a mut [W],
    pos: BitPosition,
}

impl<'a, W: BitWord> BitWriter<'a, W> {
    /// Writer starting at the first word of `data`.
    pub fn new(data: &'a mut [W]) -> Self {
        Self::at(data, 0)
    }

    /// Writer starting at word index `word` of `data`.
    pub fn at(data: &'a mut [W], word: usize) -> Self {
        Self {
            data,
            pos: BitPosition::at_word(word),
        }
    }

    /// Set (or leave clear) the next bit.
    ///
    /// # Panics
    /// If the buffer is full.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        self.pos.load_word::<W>();
        let word = &mut self.data[self.pos.word];
        if bit {
            *word = word.with_bit(self.pos.bit);
        }
        self.pos.bit += 1;
    }

    /// Write the low `bits` bits of `value`, least significant first.
    ///
    /// # Panics
    /// If `bits` exceeds the width of `T`, or the buffer runs out.
    pub fn write_number_raw<T: BitWord>(&mut self, value: T, bits: u32) {
        assert!(
            bits <= T::BITS,
            "cannot write {bits} bits from a {}-bit integer",
            T::BITS
        );
        for i in 0..bits {
            self.write_bit(value.bit(i));
        }
    }

    /// Emit the code for `symbol`.
    ///
    /// # Panics
    /// If `symbol` is outside the model's alphabet, or the buffer runs out.
    pub fn write_number_huffman(&mut self, model: &HuffmanModel, symbol: u32) {
        self.write_huffman_writer(model.writer(symbol));
    }

    /// Emit whatever bits `writer` still holds.
    pub fn write_huffman_writer(&mut self, mut writer: HuffmanWriter) {
        while writer.has_bit() {
            self.write_bit(writer.get_bit());
            writer.next_bit();
        }
    }

    /// Checked [`write_bit`](Self::write_bit).
    pub fn try_write_bit(&mut self, bit: bool) -> Result<()> {
        if self.remaining_bits() == 0 {
            return Err(BitIoError::UnexpectedEof.into());
        }
        self.write_bit(bit);
        Ok(())
    }

    /// Checked [`write_number_raw`](Self::write_number_raw).
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` if `bits` exceeds the width of `T`
    /// - `BitIoError::InsufficientBits` if the buffer has less than `bits` left
    pub fn try_write_number_raw<T: BitWord>(&mut self, value: T, bits: u32) -> Result<()> {
        check_width::<T>(bits)?;
        check_room(bits as usize, self.remaining_bits())?;
        self.write_number_raw(value, bits);
        Ok(())
    }

    /// Checked [`write_number_huffman`](Self::write_number_huffman).
    ///
    /// Nothing is written unless `symbol` is in the alphabet and the whole
    /// code fits.
    pub fn try_write_number_huffman(&mut self, model: &HuffmanModel, symbol: u32) -> Result<()> {
        if symbol as usize >= model.outputs() {
            return Err(HuffmanError::SymbolOutOfRange {
                symbol,
                outputs: model.outputs(),
            }
            .into());
        }
        let writer = model.writer(symbol);
        check_room(writer.bits_left() as usize, self.remaining_bits())?;
        self.write_huffman_writer(writer);
        Ok(())
    }

    /// Words touched since word `start`, counting a partial word as whole.
    pub fn get_element_size(&self, start: usize) -> usize {
        self.pos.element_size(start)
    }

    /// Exact number of bits written since word `start`.
    pub fn get_bit_size(&self, start: usize) -> usize {
        self.pos.bit_size::<W>(start)
    }

    /// Bits left before the end of the buffer.
    pub fn remaining_bits(&self) -> usize {
        self.pos.remaining_bits::<W>(self.data.len())
    }

    pub fn position(&self) -> BitPosition {
        self.pos
    }
}

/// Reads bits LSB-first from a word buffer.
///
/// The buffer carries no length marker: the caller knows how many fields
/// to read, and padding bits after the last field read back as zeros.
#[derive(Debug, Clone)]
pub struct BitReader<'a, W: BitWord = u32> {
    data: &'a [W],
    pos: BitPosition,
}

impl<'a, W: BitWord> BitReader<'a, W> {
    /// Reader starting at the first word of `data`.
    pub fn new(data: &'a [W]) -> Self {
        Self::at(data, 0)
    }

    /// Reader starting at word index `word` of `data`.
    pub fn at(data: &'a [W], word: usize) -> Self {
        Self {
            data,
            pos: BitPosition::at_word(word),
        }
    }

    /// Read the next bit.
    ///
    /// # Panics
    /// If the buffer is exhausted.
    #[inline]
    pub fn read_bit(&mut self) -> bool {
        self.pos.load_word::<W>();
        let bit = self.data[self.pos.word].bit(self.pos.bit);
        self.pos.bit += 1;
        bit
    }

    /// Read `bits` bits, least significant first, into a `T`.
    ///
    /// # Panics
    /// If `bits` exceeds the width of `T`, or the buffer runs out.
    pub fn read_number_raw<T: BitWord>(&mut self, bits: u32) -> T {
        assert!(
            bits <= T::BITS,
            "cannot read {bits} bits into a {}-bit integer",
            T::BITS
        );
        let mut value = T::ZERO;
        for i in 0..bits {
            if self.read_bit() {
                value = value.with_bit(i);
            }
        }
        value
    }

    /// Decode one symbol with `model`.
    ///
    /// # Panics
    /// If the buffer runs out before a leaf is reached.
    pub fn read_number_huffman(&mut self, model: &HuffmanModel) -> u32 {
        let mut reader = model.reader();
        while reader.needs_bit() {
            reader.recv_bit(self.read_bit());
        }
        reader.get_result()
    }

    /// Checked [`read_bit`](Self::read_bit).
    pub fn try_read_bit(&mut self) -> Result<bool> {
        if self.remaining_bits() == 0 {
            return Err(BitIoError::UnexpectedEof.into());
        }
        Ok(self.read_bit())
    }

    /// Checked [`read_number_raw`](Self::read_number_raw).
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` if `bits` exceeds the width of `T`
    /// - `BitIoError::InsufficientBits` if the buffer has less than `bits` left
    pub fn try_read_number_raw<T: BitWord>(&mut self, bits: u32) -> Result<T> {
        check_width::<T>(bits)?;
        check_room(bits as usize, self.remaining_bits())?;
        Ok(self.read_number_raw(bits))
    }

    /// Checked [`read_number_huffman`](Self::read_number_huffman).
    ///
    /// # Errors
    /// `BitIoError::UnexpectedEof` if the buffer ends inside a code.
    pub fn try_read_number_huffman(&mut self, model: &HuffmanModel) -> Result<u32> {
        let mut reader = model.reader();
        while reader.needs_bit() {
            reader.recv_bit(self.try_read_bit()?);
        }
        Ok(reader.get_result())
    }

    /// Words touched since word `start`, counting a partial word as whole.
    pub fn get_element_size(&self, start: usize) -> usize {
        self.pos.element_size(start)
    }

    /// Exact number of bits read since word `start`.
    pub fn get_bit_size(&self, start: usize) -> usize {
        self.pos.bit_size::<W>(start)
    }

    /// Bits left before the end of the buffer.
    pub fn remaining_bits(&self) -> usize {
        self.pos.remaining_bits::<W>(self.data.len())
    }

    pub fn position(&self) -> BitPosition {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_lsb_first_packing() {
        let mut buf = [0u8; 2];
        let mut writer = BitWriter::new(&mut buf);
        for bit in [true, false, true, true, false, false, false, false, true] {
            writer.write_bit(bit);
        }
        assert_eq!(writer.get_bit_size(0), 9);
        assert_eq!(writer.get_element_size(0), 2);
        assert_eq!(buf, [0b0000_1101, 0b0000_0001]);
    }

    #[test]
    fn test_write_read_bits() {
        let mut buf = [0u32; 3];
        let pattern: Vec<bool> = (0..70).map(|i| i % 3 == 0 || i % 7 == 0).collect();

        let mut writer = BitWriter::new(&mut buf);
        for &bit in &pattern {
            writer.write_bit(bit);
        }

        let mut reader = BitReader::new(&buf);
        for &expected in &pattern {
            assert_eq!(reader.read_bit(), expected);
        }
        assert_eq!(reader.get_bit_size(0), 70);
    }

    #[test]
    fn test_write_only_sets_bits() {
        let mut buf = [0b1000_0000u8];
        let mut writer = BitWriter::new(&mut buf);
        writer.write_number_raw(0b0101u8, 4);
        assert_eq!(buf, [0b1000_0101]);
    }

    #[test]
    fn test_raw_numbers() {
        let mut buf = [0u16; 8];
        let mut writer = BitWriter::new(&mut buf);
        writer.write_number_raw(5u32, 3);
        writer.write_number_raw(0x1234_5678_9ABC_DEF0u64, 64);
        writer.write_number_raw(0u8, 0);
        writer.write_number_raw(0xFFu8, 8);
        writer.write_number_raw(1u128 << 40, 41);
        assert_eq!(writer.get_bit_size(0), 3 + 64 + 8 + 41);

        let mut reader = BitReader::new(&buf);
        assert_eq!(reader.read_number_raw::<u32>(3), 5);
        assert_eq!(reader.read_number_raw::<u64>(64), 0x1234_5678_9ABC_DEF0);
        assert_eq!(reader.read_number_raw::<u8>(0), 0);
        assert_eq!(reader.read_number_raw::<u8>(8), 0xFF);
        assert_eq!(reader.read_number_raw::<u128>(41), 1u128 << 40);
    }

    #[test]
    fn test_raw_number_truncates_high_bits() {
        let mut buf = [0u32; 1];
        let mut writer = BitWriter::new(&mut buf);
        writer.write_number_raw(0xFFu8, 4);
        assert_eq!(buf, [0xF]);
    }

    #[test]
    fn test_element_size_at_word_boundary() {
        let mut buf = [0u8; 4];
        let mut writer = BitWriter::new(&mut buf);
        assert_eq!(writer.get_element_size(0), 0);
        assert_eq!(writer.get_bit_size(0), 0);

        writer.write_number_raw(0xFFu8, 8);
        // Offset sits at the end of word 0 until the next write.
        assert_eq!(writer.position().word(), 0);
        assert_eq!(writer.position().bit(), 8);
        assert_eq!(writer.get_element_size(0), 1);
        assert_eq!(writer.get_bit_size(0), 8);

        writer.write_bit(true);
        assert_eq!(writer.position().word(), 1);
        assert_eq!(writer.get_element_size(0), 2);
        assert_eq!(writer.get_bit_size(0), 9);
    }

    #[test]
    fn test_start_offset() {
        let mut buf = [0u32; 4];
        let mut writer = BitWriter::at(&mut buf, 2);
        writer.write_number_raw(0xABCu16, 12);
        assert_eq!(writer.get_element_size(2), 1);
        assert_eq!(writer.get_bit_size(2), 12);
        assert_eq!(writer.get_bit_size(0), 76);
        assert_eq!(buf, [0, 0, 0xABC, 0]);

        let mut reader = BitReader::at(&buf, 2);
        assert_eq!(reader.read_number_raw::<u16>(12), 0xABC);
    }

    #[test]
    fn test_huffman_symbols() {
        let model = HuffmanModel::from_frequencies(&[5, 2, 1, 1]).unwrap();
        let symbols = [0u32, 1, 2, 3, 0, 0, 3, 1];

        let mut buf = [0u32; 1];
        let mut writer = BitWriter::new(&mut buf);
        for &s in &symbols {
            writer.write_number_huffman(&model, s);
        }
        assert_eq!(writer.get_bit_size(0), 1 + 2 + 3 + 3 + 1 + 1 + 3 + 2);

        let mut reader = BitReader::new(&buf);
        for &s in &symbols {
            assert_eq!(reader.read_number_huffman(&model), s);
        }
        assert_eq!(reader.get_bit_size(0), 16);
    }

    #[test]
    fn test_partial_writer_resume() {
        let model = HuffmanModel::from_frequencies(&[5, 2, 1, 1]).unwrap();
        let mut buf = [0u32; 1];
        let mut writer = BitWriter::new(&mut buf);

        let mut code = model.writer(3);
        writer.write_bit(code.get_bit());
        code.next_bit();
        writer.write_huffman_writer(code);
        assert_eq!(writer.get_bit_size(0), 3);

        let mut reader = BitReader::new(&buf);
        assert_eq!(reader.read_number_huffman(&model), 3);
    }

    #[test]
    fn test_single_symbol_model_uses_no_bits() {
        let model = HuffmanModel::from_frequencies(&[7]).unwrap();
        let mut buf: [u32; 0] = [];
        let mut writer = BitWriter::new(&mut buf);
        writer.write_number_huffman(&model, 0);
        assert_eq!(writer.get_bit_size(0), 0);

        let mut reader = BitReader::new(&buf);
        assert_eq!(reader.read_number_huffman(&model), 0);
        assert_eq!(reader.get_element_size(0), 0);
    }

    #[test]
    #[should_panic]
    fn test_write_past_end_panics() {
        let mut buf = [0u8; 1];
        let mut writer = BitWriter::new(&mut buf);
        writer.write_number_raw(0u16, 9);
    }

    #[test]
    #[should_panic(expected = "cannot read 9 bits")]
    fn test_raw_width_violation_panics() {
        let buf = [0u32; 1];
        let mut reader = BitReader::new(&buf);
        let _: u8 = reader.read_number_raw(9);
    }

    #[test]
    fn test_try_raw_errors() {
        let mut buf = [0u8; 1];
        let mut writer = BitWriter::new(&mut buf);
        assert!(matches!(
            writer.try_write_number_raw(1u8, 9),
            Err(Error::BitIo(BitIoError::InvalidBitCount { bits: 9, width: 8 }))
        ));
        writer.try_write_number_raw(0x3Fu8, 6).unwrap();
        assert_eq!(writer.remaining_bits(), 2);
        assert!(matches!(
            writer.try_write_number_raw(1u8, 3),
            Err(Error::BitIo(BitIoError::InsufficientBits {
                requested: 3,
                available: 2
            }))
        ));
        writer.try_write_bit(true).unwrap();
        writer.try_write_bit(false).unwrap();
        assert!(matches!(
            writer.try_write_bit(true),
            Err(Error::BitIo(BitIoError::UnexpectedEof))
        ));

        let mut reader = BitReader::new(&buf);
        assert_eq!(reader.try_read_number_raw::<u8>(7).unwrap(), 0x7F);
        assert!(reader.try_read_number_raw::<u8>(2).is_err());
        assert!(!reader.try_read_bit().unwrap());
        assert!(reader.try_read_bit().is_err());
    }

    #[test]
    fn test_try_huffman_errors() {
        let model = HuffmanModel::from_frequencies(&[5, 2, 1, 1]).unwrap();
        let mut buf = [0u8; 1];
        let mut writer = BitWriter::new(&mut buf);
        for _ in 0..2 {
            writer.try_write_number_huffman(&model, 2).unwrap();
        }
        assert_eq!(writer.remaining_bits(), 2);
        // A 3-bit code does not fit and nothing is written.
        assert!(writer.try_write_number_huffman(&model, 3).is_err());
        assert_eq!(writer.get_bit_size(0), 6);
        writer.try_write_number_huffman(&model, 1).unwrap();

        let mut reader = BitReader::new(&buf);
        assert_eq!(reader.try_read_number_huffman(&model).unwrap(), 2);
        assert_eq!(reader.try_read_number_huffman(&model).unwrap(), 2);
        assert_eq!(reader.try_read_number_huffman(&model).unwrap(), 1);
        assert!(matches!(
            reader.try_read_number_huffman(&model),
            Err(Error::BitIo(BitIoError::UnexpectedEof))
        ));
    }

    #[test]
    fn test_try_huffman_unknown_symbol() {
        let model = HuffmanModel::from_frequencies(&[5, 2, 1, 1]).unwrap();
        let mut buf = [0u32; 1];
        let mut writer = BitWriter::new(&mut buf);
        assert!(matches!(
            writer.try_write_number_huffman(&model, 4),
            Err(Error::Huffman(HuffmanError::SymbolOutOfRange {
                symbol: 4,
                outputs: 4
            }))
        ));
        assert_eq!(writer.get_bit_size(0), 0);
        assert_eq!(buf, [0]);
    }
}
