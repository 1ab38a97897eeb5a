use std::fmt;

use log::{debug, error, info, warn};
use thiserror::Error;

use super::color::Color;
use super::format::{Header, Image};
use crate::compression::bitpack::BitPackError;
use crate::compression::palette::{Palette, PaletteDecompressionError};
use crate::compression::{decompress, DecompressionError};
use crate::constants::{
    CHANNELS, FIELD_SEPARATOR, HEADER_DELIMITER, HEADER_FIELD_COUNT, MAX_HEADER_LEN,
    MAX_PALETTE_SIZE, MAX_PIXELS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Palette,
    Bitstream,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Palette => f.write_str("palette table"),
            Section::Bitstream => f.write_str("index bitstream"),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Malformed header: {0}")]
    MalformedHeader(String),
    #[error("Invalid palette size {0}: expected 1 to {max}", max = MAX_PALETTE_SIZE)]
    InvalidPaletteSize(i64),
    #[error("Unexpected end of data in {section}: expected {expected} bytes, got {actual}")]
    TruncatedData {
        section: Section,
        expected: usize,
        actual: usize,
    },
    #[error("Image {width}x{height} exceeds the limit of {max} pixels", max = MAX_PIXELS)]
    ImageTooLarge { width: u32, height: u32 },
    #[error("Palette index {index} out of range for palette size {palette_size}")]
    IndexOutOfRange { index: usize, palette_size: usize },
    #[error("Decompression failed")]
    DecompressionFailed(#[source] DecompressionError),
}

impl From<DecompressionError> for DecodeError {
    fn from(err: DecompressionError) -> Self {
        match err {
            DecompressionError::BitUnpackFailed(BitPackError::TruncatedData {
                needed,
                available,
                ..
            }) => DecodeError::TruncatedData {
                section: Section::Bitstream,
                expected: needed,
                actual: available,
            },
            DecompressionError::PaletteDecompressionFailed(
                PaletteDecompressionError::IndexOutOfRange {
                    index,
                    palette_size,
                },
            ) => DecodeError::IndexOutOfRange {
                index,
                palette_size,
            },
            other => DecodeError::DecompressionFailed(other),
        }
    }
}

/// Parses and validates the header line only.
///
/// Returns the header and the offset of the first palette byte.
pub fn read_header(encoded_data: &[u8]) -> Result<(Header, usize), DecodeError> {
    let search_len = encoded_data.len().min(MAX_HEADER_LEN);
    let delimiter = encoded_data[..search_len]
        .iter()
        .position(|&byte| byte == HEADER_DELIMITER)
        .ok_or_else(|| {
            error!(
                "No header delimiter within the first {} bytes",
                MAX_HEADER_LEN
            );
            DecodeError::MalformedHeader(format!(
                "no line feed within the first {} bytes",
                MAX_HEADER_LEN
            ))
        })?;

    let mut line = &encoded_data[..delimiter];
    if let Some(stripped) = line.strip_suffix(b"\r") {
        warn!("Header terminated by CRLF, accepting");
        line = stripped;
    }

    let line = std::str::from_utf8(line).map_err(|_| {
        error!("Header is not ASCII");
        DecodeError::MalformedHeader("header is not ASCII".to_string())
    })?;

    let fields: Vec<&str> = line.split(char::from(FIELD_SEPARATOR)).collect();
    if fields.len() != HEADER_FIELD_COUNT {
        error!("Header has {} fields", fields.len());
        return Err(DecodeError::MalformedHeader(format!(
            "expected {} fields, got {}",
            HEADER_FIELD_COUNT,
            fields.len()
        )));
    }

    let width = parse_dimension("width", fields[0])?;
    let height = parse_dimension("height", fields[1])?;

    let pixel_count = (width as usize).checked_mul(height as usize);
    if pixel_count.map_or(true, |count| count > MAX_PIXELS) {
        error!("Image {}x{} exceeds the pixel limit", width, height);
        return Err(DecodeError::ImageTooLarge { width, height });
    }

    let palette_size = parse_field("palette size", fields[2])?;
    if palette_size < 1 || palette_size > MAX_PALETTE_SIZE as i64 {
        error!("Invalid palette size {}", palette_size);
        return Err(DecodeError::InvalidPaletteSize(palette_size));
    }

    let header = Header {
        width,
        height,
        palette_size: palette_size as u32,
    };
    debug!(
        "Header read: width={} height={} palette_size={}",
        header.width, header.height, header.palette_size
    );

    Ok((header, delimiter + 1))
}

fn parse_field(name: &str, raw: &str) -> Result<i64, DecodeError> {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        error!("Header field {} is not a number: {:?}", name, raw);
        return Err(DecodeError::MalformedHeader(format!(
            "{} {:?} is not a decimal integer",
            name, raw
        )));
    }

    raw.parse::<i64>().map_err(|_| {
        error!("Header field {} is out of range: {:?}", name, raw);
        DecodeError::MalformedHeader(format!("{} {:?} is out of range", name, raw))
    })
}

fn parse_dimension(name: &str, raw: &str) -> Result<u32, DecodeError> {
    let value = parse_field(name, raw)?;
    match u32::try_from(value) {
        Ok(value) if value > 0 => Ok(value),
        _ => {
            error!("Invalid {} {}", name, value);
            Err(DecodeError::MalformedHeader(format!(
                "{} must be a positive integer, got {}",
                name, value
            )))
        }
    }
}

pub fn decode(encoded_data: &[u8]) -> Result<Image, DecodeError> {
    info!("Starting decoding");

    // Read width, height and palette size
    let (header, mut cursor) = read_header(encoded_data)?;

    // Read palette
    let palette_len = header.palette_len();
    let available = encoded_data.len() - cursor;
    if available < palette_len {
        error!(
            "Unexpected end of data while reading palette: need {} bytes, got {}",
            palette_len, available
        );
        return Err(DecodeError::TruncatedData {
            section: Section::Palette,
            expected: palette_len,
            actual: available,
        });
    }

    let colors: Vec<Color> = encoded_data[cursor..cursor + palette_len]
        .chunks_exact(CHANNELS)
        .map(|rgb| Color::new(rgb[0], rgb[1], rgb[2]))
        .collect();
    cursor += palette_len;
    debug!("Palette read with {} colors", colors.len());

    let palette = Palette::from_stored(colors).map_err(|e| {
        error!("Invalid palette: {}", e);
        DecompressionError::from(e)
    })?;

    // The remaining data is the packed index stream
    let bitstream = &encoded_data[cursor..];
    let expected = header.bitstream_len();
    if bitstream.len() > expected {
        warn!(
            "Ignoring {} trailing bytes after the index bitstream",
            bitstream.len() - expected
        );
    }

    let pixels = decompress(palette, bitstream, header.pixel_count()).map_err(|e| {
        error!("Decompression failed: {}", e);
        DecodeError::from(e)
    })?;
    info!("Decoding completed successfully");

    Ok(Image {
        width: header.width,
        height: header.height,
        pixels,
    })
}
