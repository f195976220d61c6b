//! Little-endian binary helpers shared by the record parsers and writers.
//!
//! Reads are bounds-checked and return [`BinaryError`] instead of panicking;
//! writes append to a `Vec<u8>` or patch a fixed offset in place.

use thiserror::Error;
use zerocopy::{FromBytes, I32, LE, U16, U32};

/// Binary parsing error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BinaryError {
    /// Not enough data to read the requested type
    #[error("Insufficient data: expected {expected}, got {available}")]
    InsufficientData { expected: usize, available: usize },
}

/// Result type for binary operations
pub type BinaryResult<T> = Result<T, BinaryError>;

#[inline]
fn window(data: &[u8], offset: usize, width: usize) -> BinaryResult<&[u8]> {
    let end = offset.checked_add(width).ok_or(BinaryError::InsufficientData {
        expected: usize::MAX,
        available: data.len(),
    })?;
    data.get(offset..end).ok_or(BinaryError::InsufficientData {
        expected: end,
        available: data.len(),
    })
}

/// Read a little-endian u16 from a byte slice at the given offset.
///
/// # Examples
///
/// ```
/// use officeart::common::binary::read_u16_le;
/// let data = [0x34, 0x12, 0x78, 0x56];
/// assert_eq!(read_u16_le(&data, 0).unwrap(), 0x1234);
/// assert_eq!(read_u16_le(&data, 2).unwrap(), 0x5678);
/// ```
#[inline]
pub fn read_u16_le(data: &[u8], offset: usize) -> BinaryResult<u16> {
    let bytes = window(data, offset, 2)?;
    Ok(U16::<LE>::read_from_bytes(bytes)
        .map(|v| v.get())
        .unwrap_or_default())
}

/// Read a little-endian u32 from a byte slice at the given offset.
///
/// # Examples
///
/// ```
/// use officeart::common::binary::read_u32_le;
/// let data = [0x78, 0x56, 0x34, 0x12];
/// assert_eq!(read_u32_le(&data, 0).unwrap(), 0x12345678);
/// ```
#[inline]
pub fn read_u32_le(data: &[u8], offset: usize) -> BinaryResult<u32> {
    let bytes = window(data, offset, 4)?;
    Ok(U32::<LE>::read_from_bytes(bytes)
        .map(|v| v.get())
        .unwrap_or_default())
}

/// Read a little-endian i32 from a byte slice at the given offset.
#[inline]
pub fn read_i32_le(data: &[u8], offset: usize) -> BinaryResult<i32> {
    let bytes = window(data, offset, 4)?;
    Ok(I32::<LE>::read_from_bytes(bytes)
        .map(|v| v.get())
        .unwrap_or_default())
}

/// Overwrite a little-endian u32 at `offset`.
#[inline]
pub fn put_u32_le(data: &mut [u8], offset: usize, value: u32) -> BinaryResult<()> {
    let available = data.len();
    let slot = data
        .get_mut(offset..offset.saturating_add(4))
        .filter(|s| s.len() == 4)
        .ok_or(BinaryError::InsufficientData {
            expected: offset.saturating_add(4),
            available,
        })?;
    slot.copy_from_slice(&value.to_le_bytes());
    Ok(())
}

/// Decode UTF-16LE text, replacing malformed surrogates.
///
/// Matches POI's `StringUtil.getFromUnicodeLE`: every code unit is kept,
/// including embedded NULs. A dangling odd byte is ignored.
pub fn decode_utf16le(data: &[u8]) -> String {
    let even = &data[..data.len() & !1];
    let (text, _) = encoding_rs::UTF_16LE.decode_without_bom_handling(even);
    text.into_owned()
}

/// Encode text as UTF-16LE.
pub fn encode_utf16le(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2);
    for unit in text.encode_utf16() {
        out.extend_from_slice(&unit.to_le_bytes());
    }
    out
}

/// Decode "compressed unicode" (ISO-8859-1) text.
pub fn decode_latin1(data: &[u8]) -> String {
    data.iter().map(|&b| b as char).collect()
}

/// Encode text as "compressed unicode" if every character fits in one byte.
pub fn encode_latin1(text: &str) -> Option<Vec<u8>> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_u16_le() {
        let data = [0x34, 0x12, 0x78, 0x56];
        assert!(read_u16_le(&data, 0).is_ok_and(|v| v == 0x1234));
        assert!(read_u16_le(&data, 2).is_ok_and(|v| v == 0x5678));
        assert!(read_u16_le(&data, 3).is_err());
    }

    #[test]
    fn test_read_u32_le() {
        let data = [0x78, 0x56, 0x34, 0x12];
        assert!(read_u32_le(&data, 0).is_ok_and(|v| v == 0x12345678));
        assert!(read_u32_le(&data, 1).is_err());
        assert!(read_u32_le(&data, usize::MAX).is_err());
    }

    #[test]
    fn test_read_i32_le() {
        let data = [0xFF, 0xFF, 0xFF, 0xFF];
        assert_eq!(read_i32_le(&data, 0).unwrap(), -1);
    }

    #[test]
    fn test_put_u32_le() {
        let mut data = [0u8; 8];
        put_u32_le(&mut data, 4, 0x0102_0304).unwrap();
        assert_eq!(&data[4..], &[0x04, 0x03, 0x02, 0x01]);
        assert!(put_u32_le(&mut data, 5, 1).is_err());
    }

    #[test]
    fn test_utf16le_roundtrip() {
        let data = encode_utf16le("Hello \u{00E9}");
        assert_eq!(data.len(), 14);
        assert_eq!(decode_utf16le(&data), "Hello \u{00E9}");
    }

    #[test]
    fn test_latin1() {
        assert_eq!(decode_latin1(b"Caf\xE9"), "Caf\u{00E9}");
        assert_eq!(encode_latin1("Caf\u{00E9}"), Some(b"Caf\xE9".to_vec()));
        assert_eq!(encode_latin1("\u{4E2D}"), None);
    }
}
