use image::ImageError;
use lib_bitpal::constants::{FILE_EXT, FORMAT_NAME};
use lib_bitpal::{decode, encode, read_header, DecodeError, EncodingError, Header, Image};
use log::info;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::image_source::{to_rgb_image, ImageSource};

#[derive(Error, Debug)]
pub enum ImageHandlingError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Image processing error: {0}")]
    Image(#[from] ImageError),

    #[error("Invalid source image: {0}")]
    InvalidImage(#[from] lib_bitpal::ImageError),

    #[error("Encoding failed: {0}")]
    Encode(#[from] EncodingError),

    #[error("Decoding failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("Round trip mismatch at pixel ({x}, {y})")]
    RoundTripMismatch { x: u32, y: u32 },
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> ImageHandlingError + '_ {
    move |source| ImageHandlingError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// `input` with its extension swapped for `extension`, unless an explicit output was given.
pub fn output_path(input: &Path, output: Option<PathBuf>, extension: &str) -> PathBuf {
    output.unwrap_or_else(|| input.with_extension(extension))
}

/// Reads any format the `image` crate understands into a pixel grid.
pub fn open_standard_image(path: &Path) -> Result<Image, ImageHandlingError> {
    let source = image::open(path)?;
    let grid = source.to_grid()?;
    info!("Loaded {} ({}x{})", path.display(), grid.width, grid.height);
    Ok(grid)
}

pub fn save_png(path: &Path, grid: &Image) -> Result<(), ImageHandlingError> {
    let buffer = to_rgb_image(grid).ok_or_else(|| {
        lib_bitpal::ImageError::InvalidInput(format!(
            "{}x{} grid holds {} pixels",
            grid.width,
            grid.height,
            grid.pixels.len()
        ))
    })?;
    buffer.save_with_format(path, image::ImageFormat::Png)?;
    info!("Saved {}", path.display());
    Ok(())
}

pub fn read_encoded(path: &Path) -> Result<Vec<u8>, ImageHandlingError> {
    fs::read(path).map_err(io_error(path))
}

pub fn write_encoded(path: &Path, data: &[u8]) -> Result<(), ImageHandlingError> {
    fs::write(path, data).map_err(io_error(path))
}

pub fn encode_file(input: &Path, output: Option<PathBuf>) -> Result<PathBuf, ImageHandlingError> {
    let grid = open_standard_image(input)?;
    let encoded = encode(&grid)?;

    let output = output_path(input, output, FILE_EXT);
    write_encoded(&output, &encoded)?;
    println!(
        "Encoded {} -> {} ({} bytes, raw RGB {} bytes)",
        input.display(),
        output.display(),
        encoded.len(),
        grid.to_rgb().len()
    );
    Ok(output)
}

pub fn decode_file(input: &Path, output: Option<PathBuf>) -> Result<PathBuf, ImageHandlingError> {
    let encoded = read_encoded(input)?;
    let grid = decode(&encoded)?;

    let output = output_path(input, output, "png");
    save_png(&output, &grid)?;
    println!(
        "Decoded {} -> {} ({}x{})",
        input.display(),
        output.display(),
        grid.width,
        grid.height
    );
    Ok(output)
}

/// Encodes and decodes in memory, then checks the result pixel by pixel.
pub fn round_trip_file(
    input: &Path,
    output: Option<PathBuf>,
    keep: Option<PathBuf>,
) -> Result<PathBuf, ImageHandlingError> {
    let original = open_standard_image(input)?;
    let encoded = encode(&original)?;

    if let Some(keep) = keep {
        write_encoded(&keep, &encoded)?;
        info!("Kept intermediate file {}", keep.display());
    }

    let decoded = decode(&encoded)?;
    verify(&original, &decoded)?;

    let output = output_path(input, output, "png");
    save_png(&output, &decoded)?;
    println!(
        "Round trip {} -> {} verified ({} bytes encoded)",
        input.display(),
        output.display(),
        encoded.len()
    );
    Ok(output)
}

fn verify(original: &Image, decoded: &Image) -> Result<(), ImageHandlingError> {
    if original.width != decoded.width || original.height != decoded.height {
        return Err(ImageHandlingError::RoundTripMismatch { x: 0, y: 0 });
    }

    match original
        .pixels
        .iter()
        .zip(&decoded.pixels)
        .position(|(a, b)| a != b)
    {
        Some(index) => Err(ImageHandlingError::RoundTripMismatch {
            x: index as u32 % original.width,
            y: index as u32 / original.width,
        }),
        None => Ok(()),
    }
}

pub fn inspect_file(input: &Path) -> Result<Header, ImageHandlingError> {
    let encoded = read_encoded(input)?;
    let (header, offset) = read_header(&encoded)?;

    println!("File:          {}", input.display());
    print!("{}", describe(&header, offset, encoded.len()));
    Ok(header)
}

/// Human-readable layout of an encoded file.
fn describe(header: &Header, header_len: usize, file_len: usize) -> String {
    let total = header_len + header.palette_len() + header.bitstream_len();
    [
        format!("Format:        {} (.{})", FORMAT_NAME, FILE_EXT),
        format!("Dimensions:    {}x{}", header.width, header.height),
        format!("Palette size:  {}", header.palette_size),
        format!("Index width:   {} bits", header.index_width()),
        format!("Header:        {} bytes", header_len),
        format!("Palette table: {} bytes", header.palette_len()),
        format!("Bitstream:     {} bytes", header.bitstream_len()),
        format!("Total:         {} bytes (file has {})", total, file_len),
    ]
    .iter()
    .map(|line| format!("{}\n", line))
    .collect()
}
