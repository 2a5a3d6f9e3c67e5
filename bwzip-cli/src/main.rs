//! bwzip CLI - block-sorting file compressor.
//!
//! Compresses files through the BWT + MTF + Huffman pipeline into `.bwz`
//! streams and back.

mod commands;
mod utils;

use clap::{Parser, Subcommand};
use commands::{cmd_compress, cmd_decompress, cmd_info};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bwzip")]
#[command(
    author,
    version,
    about = "Block-sorting compressor (BWT + MTF + Huffman)"
)]
#[command(long_about = "
bwzip compresses files one block at a time: a Burrows-Wheeler Transform
clusters similar bytes, a Move-to-Front pass turns the clustering into
small rank values, and canonical Huffman coding packs the ranks into bits.

Examples:
  bwzip compress file.txt
  bwzip compress -l 1 -o out.bwz file.txt
  bwzip decompress file.txt.bwz
  bwzip info file.txt.bwz
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file
    #[command(alias = "c")]
    Compress {
        /// File to compress
        input: PathBuf,

        /// Output file (defaults to `<input>.bwz`)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Compression level 1-9; higher levels use larger blocks
        #[arg(short = 'l', long, default_value = "9")]
        level: u8,

        /// Show progress bar
        #[arg(short = 'P', long, default_value = "true")]
        progress: bool,
    },

    /// Decompress a .bwz file
    #[command(alias = "d", alias = "x")]
    Decompress {
        /// File to decompress
        input: PathBuf,

        /// Output file (defaults to `<input>` without its `.bwz` suffix)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show progress bar
        #[arg(short = 'P', long, default_value = "true")]
        progress: bool,
    },

    /// Show information about a .bwz file
    #[command(alias = "i")]
    Info {
        /// File to inspect
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compress {
            input,
            output,
            level,
            progress,
        } => cmd_compress(&input, output.as_deref(), level, progress),
        Commands::Decompress {
            input,
            output,
            progress,
        } => cmd_decompress(&input, output.as_deref(), progress),
        Commands::Info { input } => cmd_info(&input),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
