pub mod compression;
pub mod constants;
pub mod image;

use log::*;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

pub use crate::compression::palette::{index_width, Palette};
pub use crate::image::color::Color;
pub use crate::image::decoder::{DecodeError, Section};
pub use crate::image::encoder::EncodingError;
pub use crate::image::format::{Header, Image, ImageError};
pub use crate::image::{decode, encode, read_header};

/// Where log records go and how much of them.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LevelFilter,
    pub file: Option<PathBuf>, // stderr when unset
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Warn,
            file: None,
        }
    }
}

/// Installs the global logger. A second call leaves the first logger in place.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    let mut builder = env_logger::Builder::new();

    if let Some(path) = &config.file {
        let target = Box::new(File::create(path)?);
        builder.target(env_logger::Target::Pipe(target));
    }

    let result = builder
        .filter_level(config.level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}:{}] {}",
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .try_init();

    if result.is_err() {
        debug!("Logger already initialised, keeping the existing one");
    }

    Ok(())
}
