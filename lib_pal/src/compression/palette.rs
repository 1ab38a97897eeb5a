use std::collections::HashSet;

use thiserror::Error;

use crate::image::color::Color;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PaletteCompressionError {
    #[error("Invalid input: cannot build a palette from an empty pixel grid")]
    EmptyInput,
    #[error("Color {0:?} is missing from the palette")]
    MissingColor(Color),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PaletteDecompressionError {
    #[error("Invalid palette: a palette needs at least one color")]
    EmptyPalette,
    #[error("Palette index {index} out of range for palette size {palette_size}")]
    IndexOutOfRange { index: usize, palette_size: usize },
}

/// The unique colors of an image.
///
/// Palettes built from pixels are sorted ascending by [`Color::key`]; palettes read
/// back from a file keep their stored order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Collects the unique colors of `pixels`, sorted by canonical key.
    pub fn from_pixels(pixels: &[Color]) -> Result<Self, PaletteCompressionError> {
        if pixels.is_empty() {
            return Err(PaletteCompressionError::EmptyInput);
        }

        let unique: HashSet<Color> = pixels.iter().copied().collect();
        let mut colors: Vec<Color> = unique.into_iter().collect();
        colors.sort_unstable_by_key(|color| color.key());

        Ok(Self { colors })
    }

    /// Wraps colors in their stored order without re-sorting.
    pub fn from_stored(colors: Vec<Color>) -> Result<Self, PaletteDecompressionError> {
        if colors.is_empty() {
            return Err(PaletteDecompressionError::EmptyPalette);
        }
        Ok(Self { colors })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn get(&self, index: usize) -> Option<Color> {
        self.colors.get(index).copied()
    }

    /// Position of `color`, found by binary search on the canonical key.
    ///
    /// Only meaningful for palettes built with [`Palette::from_pixels`].
    pub fn index_of(&self, color: Color) -> Option<usize> {
        self.colors
            .binary_search_by_key(&color.key(), |entry| entry.key())
            .ok()
    }

    pub fn index_width(&self) -> u32 {
        index_width(self.colors.len())
    }
}

/// `ceil(log2(palette_size))`: the bits needed to address every palette entry.
/// A single-color palette needs no bits.
pub fn index_width(palette_size: usize) -> u32 {
    if palette_size <= 1 {
        return 0;
    }
    usize::BITS - (palette_size - 1).leading_zeros()
}

pub struct PaletteCompression {
    pub palette: Palette,
    pub indices: Vec<u32>, // Palette position of each pixel, row-major
}

/// Builds the sorted palette of `pixels` and maps every pixel to its palette position.
///
/// # Errors
/// - Returns `PaletteCompressionError::EmptyInput` if `pixels` is empty
pub fn palette_compression(pixels: &[Color]) -> Result<PaletteCompression, PaletteCompressionError> {
    let palette = Palette::from_pixels(pixels)?;

    let indices = pixels
        .iter()
        .map(|&pixel| {
            palette
                .index_of(pixel)
                .map(|index| index as u32)
                .ok_or(PaletteCompressionError::MissingColor(pixel))
        })
        .collect::<Result<Vec<u32>, _>>()?;

    Ok(PaletteCompression { palette, indices })
}

/// Expands palette positions back into colors.
///
/// # Errors
/// - Returns `PaletteDecompressionError::IndexOutOfRange` for the first index past the palette end
pub fn palette_decompression(
    compression: &PaletteCompression,
) -> Result<Vec<Color>, PaletteDecompressionError> {
    let palette_size = compression.palette.len();

    compression
        .indices
        .iter()
        .map(|&index| {
            let index = index as usize;
            compression
                .palette
                .get(index)
                .ok_or(PaletteDecompressionError::IndexOutOfRange {
                    index,
                    palette_size,
                })
        })
        .collect()
}
