use log::{debug, error, info};
use thiserror::Error;

use super::format::{Header, Image, ImageError};
use crate::compression::{compress, CompressionError};

#[derive(Error, Debug)]
pub enum EncodingError {
    #[error("Invalid source image")]
    InvalidImage(#[from] ImageError),
    #[error("Failed to compress image data")]
    CompressionFailed(#[from] CompressionError),
}

pub fn encode(image: &Image) -> Result<Vec<u8>, EncodingError> {
    info!("Starting encoding");

    image.validate().map_err(|e| {
        error!("Rejecting source image: {}", e);
        e
    })?;

    // Step 1: Build the palette and pack the indices
    let compressed = compress(&image.pixels)?;
    debug!(
        "Image data compressed with palette size {} and index width {}",
        compressed.palette.len(),
        compressed.index_width
    );

    // Step 2: Write header
    // a 24-bit palette always fits in u32
    let header = Header {
        width: image.width,
        height: image.height,
        palette_size: compressed.palette.len() as u32,
    };
    let mut encoded_data = Vec::with_capacity(header.encoded_len());
    header.write_to(&mut encoded_data);
    debug!(
        "Header written: width={} height={} palette_size={}",
        header.width, header.height, header.palette_size
    );

    // Step 3: Palette table, one RGB triple per entry
    for color in compressed.palette.colors() {
        encoded_data.extend_from_slice(&color.to_bytes());
    }
    debug!("Palette data written with {} colors", compressed.palette.len());

    // Step 4: Packed index bitstream
    encoded_data.extend_from_slice(&compressed.data);
    debug!("Index bitstream added: {} bytes", compressed.data.len());

    info!(
        "Encoding process completed successfully: {} bytes",
        encoded_data.len()
    );
    Ok(encoded_data)
}
