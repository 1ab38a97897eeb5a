pub mod color;
pub mod decoder;
pub mod encoder;
pub mod format;

pub use decoder::{decode, read_header};
pub use encoder::encode;
