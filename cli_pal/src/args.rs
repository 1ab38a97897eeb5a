//! Command-line argument definitions

use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "bitpal", version, about = "Lossless bit-packed palette image codec")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write log records to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Encode a PNG/JPEG/... image into a .bpc file
    Encode {
        input: PathBuf,
        /// Output path (default: input with .bpc extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Decode a .bpc file into a PNG
    Decode {
        input: PathBuf,
        /// Output path (default: input with .png extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Encode and decode in memory, verify every pixel, write the PNG
    Roundtrip {
        input: PathBuf,
        /// Output path (default: input with .png extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also keep the intermediate .bpc file here
        #[arg(long, value_name = "BPC")]
        keep: Option<PathBuf>,
    },
    /// Print the header of a .bpc file without decoding pixels
    Inspect { input: PathBuf },
}

impl Args {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_encode() {
        let args = Args::try_parse_from(["bitpal", "encode", "villa.jpeg", "-o", "out.bpc"]).unwrap();
        match &args.command {
            Command::Encode { input, output } => {
                assert_eq!(input, &PathBuf::from("villa.jpeg"));
                assert_eq!(output, &Some(PathBuf::from("out.bpc")));
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(args.log_level(), LevelFilter::Warn);
    }

    #[test]
    fn test_parse_verbosity_after_subcommand() {
        let args = Args::try_parse_from(["bitpal", "decode", "a.bpc", "-vv"]).unwrap();
        assert_eq!(args.log_level(), LevelFilter::Debug);
    }

    #[test]
    fn test_parse_roundtrip_keep() {
        let args =
            Args::try_parse_from(["bitpal", "roundtrip", "villa.jpeg", "--keep", "c.bpc"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Roundtrip { keep: Some(_), output: None, .. }
        ));
    }

    #[test]
    fn test_missing_input_is_rejected() {
        assert!(Args::try_parse_from(["bitpal", "inspect"]).is_err());
    }
}
