//! Memory model primitives for the flat byte-addressed address space.

use std::ops::Range;

use crate::FaultCode;

/// Architectural machine word.
pub type Word = u64;
/// Architectural byte address.
pub type Address = u64;

/// Size in bytes of one machine word.
pub const WORD_BYTES: usize = 8;

/// Default size of the backing store (64 KiB).
pub const DEFAULT_MEMORY_BYTES: usize = 0x1_0000;

/// Allocates a zeroed backing store of `bytes` bytes.
#[must_use]
pub fn new_address_space(bytes: usize) -> Box<[u8]> {
    vec![0; bytes].into_boxed_slice()
}

/// Resolves `width` bytes at `addr` to an index range inside `memory`.
///
/// # Errors
///
/// Returns [`FaultCode::InvalidAddress`] when any byte of the access falls
/// outside the backing store.
pub fn span(memory: &[u8], addr: Address, width: usize) -> Result<Range<usize>, FaultCode> {
    let start = usize::try_from(addr).map_err(|_| FaultCode::InvalidAddress)?;
    let end = start
        .checked_add(width)
        .ok_or(FaultCode::InvalidAddress)?;
    if end > memory.len() {
        return Err(FaultCode::InvalidAddress);
    }
    Ok(start..end)
}

/// Reads a little-endian word at `addr`.
///
/// # Errors
///
/// Returns [`FaultCode::InvalidAddress`] when the word is not fully inside
/// `memory`.
pub fn read_word_le(memory: &[u8], addr: Address) -> Result<Word, FaultCode> {
    let range = span(memory, addr, WORD_BYTES)?;
    let mut bytes = [0u8; WORD_BYTES];
    bytes.copy_from_slice(&memory[range]);
    Ok(Word::from_le_bytes(bytes))
}

/// Writes a little-endian word at `addr`.
///
/// # Errors
///
/// Returns [`FaultCode::InvalidAddress`] when the word is not fully inside
/// `memory`. Nothing is written in that case.
pub fn write_word_le(memory: &mut [u8], addr: Address, value: Word) -> Result<(), FaultCode> {
    let range = span(memory, addr, WORD_BYTES)?;
    memory[range].copy_from_slice(&value.to_le_bytes());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{new_address_space, read_word_le, span, write_word_le, DEFAULT_MEMORY_BYTES};
    use crate::FaultCode;

    #[test]
    fn default_backing_store_is_zeroed() {
        let memory = new_address_space(DEFAULT_MEMORY_BYTES);
        assert_eq!(memory.len(), DEFAULT_MEMORY_BYTES);
        assert!(memory.iter().all(|byte| *byte == 0));
    }

    #[test]
    fn words_are_little_endian() {
        let mut memory = new_address_space(16);
        write_word_le(&mut memory, 4, 0x0102_0304_0506_0708).expect("in range");
        assert_eq!(&memory[4..12], &[8, 7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(read_word_le(&memory, 4), Ok(0x0102_0304_0506_0708));
    }

    #[test]
    fn last_full_word_is_accessible() {
        let memory = new_address_space(16);
        assert_eq!(read_word_le(&memory, 8), Ok(0));
        assert_eq!(read_word_le(&memory, 9), Err(FaultCode::InvalidAddress));
    }

    #[test]
    fn out_of_range_write_leaves_memory_untouched() {
        let mut memory = new_address_space(16);
        assert_eq!(
            write_word_le(&mut memory, 12, u64::MAX),
            Err(FaultCode::InvalidAddress)
        );
        assert!(memory.iter().all(|byte| *byte == 0));
    }

    #[test]
    fn span_rejects_wrapping_addresses() {
        let memory = new_address_space(16);
        assert_eq!(span(&memory, u64::MAX, 8), Err(FaultCode::InvalidAddress));
        assert_eq!(span(&memory, 15, 1), Ok(15..16));
        assert_eq!(span(&memory, 16, 1), Err(FaultCode::InvalidAddress));
    }
}
