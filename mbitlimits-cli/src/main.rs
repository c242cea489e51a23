// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::error;

/// Lossless compression using an order-M Markov arithmetic coder.
#[derive(Parser)]
#[command(name = "mbitlimits", version)]
struct Cli {
    /// Increase logging verbosity. May be repeated (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compress a file.
    Encode {
        /// Markov order of the occurrence model (0..=31).
        #[arg(short, long, value_name = "ORDER", default_value_t = 0)]
        order: u32,
        /// File to compress.
        input: PathBuf,
        /// Where to write the compressed file.
        output: PathBuf,
    },
    /// Decompress a file produced by `encode`.
    Decode {
        /// Compressed file to read.
        input: PathBuf,
        /// Where to write the recovered file.
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    pretty_env_logger::formatted_builder().filter_level(level).init();

    let result = match cli.command {
        Command::Encode { order, input, output } => mbitlimits_core::encode_file(order, &input, &output),
        Command::Decode { input, output } => mbitlimits_core::decode_file(&input, &output),
    };

    if let Err(err) = result {
        error!("{}", err);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
