use image::{DynamicImage, GenericImageView};
use lib_bitpal::{Color, Image, ImageError};

/// Anything that can hand out a color per pixel.
pub trait ImageSource {
    /// Get the dimensions of the image (width, height)
    fn dims(&self) -> (u32, u32);

    /// Get a pixel at the specified coordinates. Alpha is dropped.
    fn pixel(&self, x: u32, y: u32) -> Color;

    /// Copy the whole source into a codec pixel grid
    fn to_grid(&self) -> Result<Image, ImageError> {
        let (width, height) = self.dims();
        Image::from_fn(width, height, |x, y| self.pixel(x, y))
    }
}

impl ImageSource for DynamicImage {
    fn dims(&self) -> (u32, u32) {
        GenericImageView::dimensions(self)
    }

    fn pixel(&self, x: u32, y: u32) -> Color {
        Color::from_rgba(GenericImageView::get_pixel(self, x, y).0)
    }
}

/// Pixel-grid sink: an opaque RGB image buffer ready for any `image` encoder.
pub fn to_rgb_image(grid: &Image) -> Option<image::RgbImage> {
    image::RgbImage::from_raw(grid.width, grid.height, grid.to_rgb())
}
