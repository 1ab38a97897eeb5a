pub const FORMAT_NAME: &str = "Bit-Packed Palette";
pub const FILE_EXT: &str = "bpc";

/// Terminates the ASCII header line.
pub const HEADER_DELIMITER: u8 = b'\n';
/// Separates the header fields.
pub const FIELD_SEPARATOR: u8 = b' ';
pub const HEADER_FIELD_COUNT: usize = 3;

// Three u32 decimals, two separators, an optional '\r' and the delimiter fit well within this.
pub const MAX_HEADER_LEN: usize = 64;

/// Bytes stored per palette entry (R, G, B).
pub const CHANNELS: usize = 3;

/// Every 24-bit color, the most a palette can ever hold.
pub const MAX_PALETTE_SIZE: usize = 1 << 24;

/// Widest index the bit packer accepts.
pub const MAX_BIT_WIDTH: u32 = 32;

/// Largest pixel grid the codec will build, 16384x16384.
pub const MAX_PIXELS: usize = 1 << 28;
