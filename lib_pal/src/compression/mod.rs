pub mod bitpack;
pub mod palette;

use bitpack::BitPackError;
use log::{debug, info};
use palette::{Palette, PaletteCompressionError, PaletteDecompressionError};
use thiserror::Error;

use crate::constants::CHANNELS;
use crate::image::color::Color;

#[derive(Error, Debug)]
pub enum CompressionError {
    #[error("Palette compression failed")]
    PaletteCompressionFailed(#[from] PaletteCompressionError),
    #[error("Index packing failed")]
    BitPackFailed(#[from] BitPackError),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecompressionError {
    #[error("Index unpacking failed")]
    BitUnpackFailed(#[from] BitPackError),
    #[error("Palette expansion failed")]
    PaletteDecompressionFailed(#[from] PaletteDecompressionError),
}

pub struct CompressionResult {
    pub palette: Palette,
    pub index_width: u32,
    pub data: Vec<u8>, // Packed index bitstream
}

pub fn compress(pixels: &[Color]) -> Result<CompressionResult, CompressionError> {
    info!("Starting compression");
    debug!("Input pixel count: {}", pixels.len());

    // Step 1: Palette construction and index mapping
    let palette_compressed = palette::palette_compression(pixels)?;
    let index_width = palette_compressed.palette.index_width();
    debug!(
        "Palette built: {} unique colors, index width {} bits",
        palette_compressed.palette.len(),
        index_width
    );

    // Step 2: Bit packing
    let packed = bitpack::pack(&palette_compressed.indices, index_width)?;
    debug!("Bit packing: {} bytes", packed.len());

    let raw_len = pixels.len() * CHANNELS;
    let compressed_len = palette_compressed.palette.len() * CHANNELS + packed.len();
    info!(
        "Compression completed successfully: {:.2}%",
        ((raw_len as f64 - compressed_len as f64) / raw_len as f64) * 100.0
    );

    Ok(CompressionResult {
        palette: palette_compressed.palette,
        index_width,
        data: packed,
    })
}

/// Unpacks `pixel_count` indices from `data` and expands them through `palette`.
pub fn decompress(
    palette: Palette,
    data: &[u8],
    pixel_count: usize,
) -> Result<Vec<Color>, DecompressionError> {
    info!("Starting decompression");

    let index_width = palette.index_width();
    debug!(
        "Unpacking {} indices of {} bits from {} bytes",
        pixel_count,
        index_width,
        data.len()
    );

    // Step 1: Bit unpacking
    let indices = bitpack::unpack(data, index_width, pixel_count)?;

    // Step 2: Palette expansion
    let pixels = palette::palette_decompression(&palette::PaletteCompression { palette, indices })?;
    debug!("Palette expansion: {} pixels", pixels.len());

    info!("Decompression completed successfully");

    Ok(pixels)
}
