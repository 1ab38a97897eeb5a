use thiserror::Error;

use super::color::Color;
use crate::compression::bitpack::packed_len;
use crate::compression::palette::index_width;
use crate::constants::{CHANNELS, FIELD_SEPARATOR, HEADER_DELIMITER, MAX_PIXELS};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ImageError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// A row-major pixel grid with its origin at the top left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl Image {
    pub fn new(width: u32, height: u32, pixels: Vec<Color>) -> Result<Self, ImageError> {
        let image = Self {
            width,
            height,
            pixels,
        };
        image.validate()?;
        Ok(image)
    }

    /// Builds a grid by asking `pixel` for the color at every `(x, y)`, row by row.
    pub fn from_fn<F>(width: u32, height: u32, mut pixel: F) -> Result<Self, ImageError>
    where
        F: FnMut(u32, u32) -> Color,
    {
        check_dimensions(width, height)?;

        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(pixel(x, y));
            }
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Builds a grid from raw RGBA bytes, dropping alpha.
    pub fn from_rgba(width: u32, height: u32, rgba_data: &[u8]) -> Result<Self, ImageError> {
        if rgba_data.len() % 4 != 0 {
            return Err(ImageError::InvalidInput(format!(
                "RGBA data length {} is not a multiple of 4",
                rgba_data.len()
            )));
        }

        let pixels = rgba_data
            .chunks_exact(4)
            .map(|px| Color::from_rgba([px[0], px[1], px[2], px[3]]))
            .collect();

        Self::new(width, height, pixels)
    }

    /// Checks that the grid is non-empty and that the pixel count matches its dimensions.
    pub fn validate(&self) -> Result<(), ImageError> {
        check_dimensions(self.width, self.height)?;

        let expected = self.pixel_count();
        if self.pixels.len() != expected {
            return Err(ImageError::InvalidInput(format!(
                "{}x{} image needs {} pixels, got {}",
                self.width,
                self.height,
                expected,
                self.pixels.len()
            )));
        }

        Ok(())
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Fully opaque RGBA bytes, row-major.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|color| color.to_rgba()).collect()
    }

    pub fn to_rgb(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|color| color.to_bytes()).collect()
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<(), ImageError> {
    if width == 0 || height == 0 {
        return Err(ImageError::InvalidInput(format!(
            "image dimensions must be at least 1x1, got {}x{}",
            width, height
        )));
    }

    let pixel_count = (width as usize).checked_mul(height as usize);
    if pixel_count.map_or(true, |count| count > MAX_PIXELS) {
        return Err(ImageError::InvalidInput(format!(
            "{}x{} image exceeds the limit of {} pixels",
            width, height, MAX_PIXELS
        )));
    }
    Ok(())
}

/// The ASCII line `<width> <height> <palette_size>\n` that opens every file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    pub width: u32,
    pub height: u32,
    pub palette_size: u32,
}

impl Header {
    pub fn index_width(&self) -> u32 {
        index_width(self.palette_size as usize)
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn palette_len(&self) -> usize {
        self.palette_size as usize * CHANNELS
    }

    /// Bytes taken by the packed index stream.
    pub fn bitstream_len(&self) -> usize {
        packed_len(self.pixel_count(), self.index_width())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let separator = char::from(FIELD_SEPARATOR);
        let mut line = format!(
            "{}{separator}{}{separator}{}",
            self.width, self.height, self.palette_size
        )
        .into_bytes();
        line.push(HEADER_DELIMITER);
        line
    }

    /// Size of the whole file: header line, palette table and bitstream.
    pub fn encoded_len(&self) -> usize {
        self.to_bytes().len() + self.palette_len() + self.bitstream_len()
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero_dimensions() {
        assert!(matches!(
            Image::new(0, 4, Vec::new()),
            Err(ImageError::InvalidInput(_))
        ));
        assert!(matches!(
            Image::new(4, 0, Vec::new()),
            Err(ImageError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_new_rejects_oversized_grid() {
        let result = Image::from_fn(u32::MAX, u32::MAX, |_, _| Color::BLACK);
        assert!(matches!(result, Err(ImageError::InvalidInput(_))));
    }

    #[test]
    fn test_new_rejects_pixel_count_mismatch() {
        assert!(matches!(
            Image::new(2, 2, vec![Color::BLACK; 3]),
            Err(ImageError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_from_fn_is_row_major() {
        let image = Image::from_fn(3, 2, |x, y| Color::new(x as u8, y as u8, 0)).unwrap();
        assert_eq!(image.pixels[1], Color::new(1, 0, 0));
        assert_eq!(image.pixels[3], Color::new(0, 1, 0));
        assert_eq!(image.pixel(2, 1), Some(Color::new(2, 1, 0)));
        assert_eq!(image.pixel(3, 0), None);
    }

    #[test]
    fn test_rgba_drops_alpha() {
        let image = Image::from_rgba(2, 1, &[1, 2, 3, 0, 4, 5, 6, 128]).unwrap();
        assert_eq!(image.pixels, vec![Color::new(1, 2, 3), Color::new(4, 5, 6)]);
        assert_eq!(image.to_rgba(), vec![1, 2, 3, 255, 4, 5, 6, 255]);
        assert_eq!(image.to_rgb(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_rgba_length_not_multiple_of_four() {
        assert!(matches!(
            Image::from_rgba(1, 1, &[1, 2, 3]),
            Err(ImageError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_header_bytes() {
        let header = Header {
            width: 640,
            height: 480,
            palette_size: 17,
        };
        assert_eq!(header.to_bytes(), b"640 480 17\n".to_vec());
        assert_eq!(header.index_width(), 5);
        assert_eq!(header.bitstream_len(), 640 * 480 * 5 / 8);
        assert_eq!(
            header.encoded_len(),
            11 + 17 * 3 + header.bitstream_len()
        );
    }

    #[test]
    fn test_header_single_color_has_no_bitstream() {
        let header = Header {
            width: 2,
            height: 2,
            palette_size: 1,
        };
        assert_eq!(header.index_width(), 0);
        assert_eq!(header.bitstream_len(), 0);
    }
}
