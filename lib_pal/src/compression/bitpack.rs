use thiserror::Error;

use crate::constants::MAX_BIT_WIDTH;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BitPackError {
    #[error("bit width {0} exceeds the maximum of {max}", max = MAX_BIT_WIDTH)]
    WidthTooLarge(u32),
    #[error("value {value} at position {position} does not fit in {width} bits")]
    ValueTooWide {
        value: u32,
        width: u32,
        position: usize,
    },
    #[error("truncated data: {count} values of {width} bits need {needed} bytes, got {available}")]
    TruncatedData {
        count: usize,
        width: u32,
        needed: usize,
        available: usize,
    },
}

/// Number of bytes holding `count` values of `width` bits, rounded up to a whole byte.
pub fn packed_len(count: usize, width: u32) -> usize {
    let total_bits = count.saturating_mul(width as usize);
    total_bits / 8 + usize::from(total_bits % 8 != 0)
}

/// Writes values LSB-first into a buffer sized up front.
///
/// # Invariants
/// - `position` never exceeds `bytes.len() * 8`
struct BitWriter {
    bytes: Vec<u8>,
    position: usize,
}

impl BitWriter {
    fn with_len(byte_len: usize) -> Self {
        Self {
            bytes: vec![0; byte_len],
            position: 0,
        }
    }

    /// Caller guarantees `value < 2^width` and that the buffer has room.
    fn write(&mut self, value: u32, width: u32) {
        let mut value = u64::from(value);
        let mut remaining = width as usize;

        while remaining > 0 {
            let offset = self.position % 8;
            let take = remaining.min(8 - offset);
            let bits = (value & ((1 << take) - 1)) as u8;

            self.bytes[self.position / 8] |= bits << offset;

            value >>= take;
            remaining -= take;
            self.position += take;
        }
    }

    fn finish(self) -> Vec<u8> {
        self.bytes
    }
}

/// Reads values LSB-first. Padding bits after the last value are never read.
struct BitReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BitReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Caller guarantees `width` bits remain.
    fn read(&mut self, width: u32) -> u32 {
        let mut result = 0u64;
        let mut read = 0;
        let width = width as usize;

        while read < width {
            let offset = self.position % 8;
            let take = (width - read).min(8 - offset);
            let bits = u64::from(self.data[self.position / 8] >> offset) & ((1 << take) - 1);

            result |= bits << read;

            read += take;
            self.position += take;
        }

        result as u32
    }
}

/// Packs each value into exactly `width` bits, LSB-first, zero-padding the final byte.
///
/// A width of 0 produces no bytes at all; every value must then be 0.
///
/// # Errors
/// - `BitPackError::WidthTooLarge` if `width` exceeds 32
/// - `BitPackError::ValueTooWide` if a value needs more than `width` bits
pub fn pack(values: &[u32], width: u32) -> Result<Vec<u8>, BitPackError> {
    if width > MAX_BIT_WIDTH {
        return Err(BitPackError::WidthTooLarge(width));
    }

    let mut writer = BitWriter::with_len(packed_len(values.len(), width));

    for (position, &value) in values.iter().enumerate() {
        if width < MAX_BIT_WIDTH && value >> width != 0 {
            return Err(BitPackError::ValueTooWide {
                value,
                width,
                position,
            });
        }
        writer.write(value, width);
    }

    Ok(writer.finish())
}

/// Reads `count` values of `width` bits each from `data`, in the order [`pack`] wrote them.
///
/// Bytes past [`packed_len`] are ignored.
///
/// # Errors
/// - `BitPackError::WidthTooLarge` if `width` exceeds 32
/// - `BitPackError::TruncatedData` if `data` holds fewer than `count * width` bits
pub fn unpack(data: &[u8], width: u32, count: usize) -> Result<Vec<u32>, BitPackError> {
    if width > MAX_BIT_WIDTH {
        return Err(BitPackError::WidthTooLarge(width));
    }

    let needed = packed_len(count, width);
    if data.len() < needed {
        return Err(BitPackError::TruncatedData {
            count,
            width,
            needed,
            available: data.len(),
        });
    }

    if width == 0 {
        return Ok(vec![0; count]);
    }

    let mut reader = BitReader::new(&data[..needed]);
    Ok((0..count).map(|_| reader.read(width)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_len_rounds_up() {
        assert_eq!(packed_len(0, 5), 0);
        assert_eq!(packed_len(8, 1), 1);
        assert_eq!(packed_len(9, 1), 2);
        assert_eq!(packed_len(3, 3), 2);
        assert_eq!(packed_len(100, 0), 0);
    }

    #[test]
    fn test_pack_three_by_three_keeps_last_byte() {
        let values = [0b101, 0b011, 0b111];
        let packed = pack(&values, 3).unwrap();
        assert_eq!(packed.len(), 2);
        // bits 0..9: 101 | 110 | 111 (LSB-first per value)
        assert_eq!(packed, vec![0b1101_1101, 0b0000_0001]);
        assert_eq!(unpack(&packed, 3, 3).unwrap(), values);
    }

    #[test]
    fn test_pack_lsb_first() {
        let packed = pack(&[1, 0, 0, 0, 0, 0, 0, 1], 1).unwrap();
        assert_eq!(packed, vec![0b1000_0001]);
    }

    #[test]
    fn test_pack_value_spanning_bytes() {
        let packed = pack(&[0, 0x1FF], 9).unwrap();
        assert_eq!(packed.len(), 3);
        assert_eq!(packed, vec![0x00, 0xFE, 0x03]);
        assert_eq!(unpack(&packed, 9, 2).unwrap(), vec![0, 0x1FF]);
    }

    #[test]
    fn test_zero_width() {
        let packed = pack(&[0, 0, 0, 0], 0).unwrap();
        assert!(packed.is_empty());
        assert_eq!(unpack(&packed, 0, 4).unwrap(), vec![0; 4]);
    }

    #[test]
    fn test_zero_width_rejects_nonzero() {
        assert!(matches!(
            pack(&[0, 1], 0),
            Err(BitPackError::ValueTooWide { value: 1, width: 0, position: 1 })
        ));
    }

    #[test]
    fn test_full_width_values() {
        let values = [u32::MAX, 0, 0xDEAD_BEEF];
        let packed = pack(&values, 32).unwrap();
        assert_eq!(packed.len(), 12);
        assert_eq!(unpack(&packed, 32, 3).unwrap(), values);
    }

    #[test]
    fn test_width_too_large() {
        assert_eq!(pack(&[1], 33), Err(BitPackError::WidthTooLarge(33)));
        assert_eq!(unpack(&[0; 8], 33, 1), Err(BitPackError::WidthTooLarge(33)));
    }

    #[test]
    fn test_value_too_wide() {
        assert!(matches!(
            pack(&[3, 4], 2),
            Err(BitPackError::ValueTooWide { value: 4, width: 2, position: 1 })
        ));
    }

    #[test]
    fn test_unpack_truncated() {
        let packed = pack(&[1, 2, 3], 3).unwrap();
        let result = unpack(&packed[..1], 3, 3);
        assert_eq!(
            result,
            Err(BitPackError::TruncatedData {
                count: 3,
                width: 3,
                needed: 2,
                available: 1,
            })
        );
    }

    #[test]
    fn test_unpack_ignores_trailing_bytes() {
        let mut packed = pack(&[5, 6], 4).unwrap();
        packed.extend_from_slice(&[0xFF, 0xFF]);
        assert_eq!(unpack(&packed, 4, 2).unwrap(), vec![5, 6]);
    }

    #[test]
    fn test_pack_length_matches_packed_len() {
        for width in 0..=MAX_BIT_WIDTH {
            for count in 0..=17usize {
                let packed = pack(&vec![0; count], width).unwrap();
                assert_eq!(packed.len(), packed_len(count, width), "width {width}, count {count}");
            }
        }
    }

    #[test]
    fn test_empty_sequence() {
        assert!(pack(&[], 7).unwrap().is_empty());
        assert!(unpack(&[], 7, 0).unwrap().is_empty());
    }

    #[test]
    fn test_round_trip_all_widths() {
        for width in 1..=24u32 {
            let max = (1u32 << width) - 1;
            for count in [0usize, 1, 7, 8, 13, 64] {
                let values: Vec<u32> = (0..count as u32)
                    .map(|i| i.wrapping_mul(2_654_435_761) & max)
                    .collect();
                let packed = pack(&values, width).unwrap();
                assert_eq!(packed.len(), packed_len(count, width));
                assert_eq!(unpack(&packed, width, count).unwrap(), values, "width {width}");
            }
        }
    }
}
