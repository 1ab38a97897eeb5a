mod args;
mod filemanager;
mod image_source;

use std::process::ExitCode;

use args::{Args, Command};
use clap::Parser;
use lib_bitpal::LogConfig;
use log::error;

fn main() -> ExitCode {
    let args = Args::parse();

    let log_config = LogConfig {
        level: args.log_level(),
        file: args.log_file.clone(),
    };
    if let Err(e) = lib_bitpal::init_logging(&log_config) {
        eprintln!("Failed to set up logging: {}", e);
        return ExitCode::FAILURE;
    }

    let result = match args.command {
        Command::Encode { input, output } => filemanager::encode_file(&input, output).map(drop),
        Command::Decode { input, output } => filemanager::decode_file(&input, output).map(drop),
        Command::Roundtrip {
            input,
            output,
            keep,
        } => filemanager::round_trip_file(&input, output, keep).map(drop),
        Command::Inspect { input } => filemanager::inspect_file(&input).map(drop),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:?}", e);
            eprintln!("bitpal: {}", e);
            ExitCode::FAILURE
        }
    }
}
