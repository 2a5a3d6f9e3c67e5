//! `bwzip decompress` implementation.

use crate::utils::format_size;
use bwzip::BwzDecoder;
use bwzip_core::Result;
use indicatif::ProgressBar;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Decompress a `.bwz` stream back into the original bytes.
pub fn cmd_decompress(input: &Path, output: Option<&Path>, progress: bool) -> Result<()> {
    let output_path = match output {
        Some(path) => path.to_path_buf(),
        None => default_output_path(input),
    };

    let reader = BufReader::new(File::open(input)?);
    let mut writer = BufWriter::new(File::create(&output_path)?);

    let mut decoder = BwzDecoder::new(reader)?;

    // The stream does not record the decompressed size up front, so this is
    // a spinner counting bytes rather than a bar.
    let pb = if progress {
        ProgressBar::new_spinner()
    } else {
        ProgressBar::hidden()
    };

    let mut total_written = 0u64;
    while let Some(block) = decoder.read_block()? {
        writer.write_all(&block)?;
        total_written += block.len() as u64;
        pb.set_message(format_size(total_written));
        pb.tick();
    }
    writer.flush()?;
    pb.finish_and_clear();

    println!(
        "{} -> {} ({})",
        input.display(),
        output_path.display(),
        format_size(total_written)
    );

    Ok(())
}

fn default_output_path(input: &Path) -> PathBuf {
    match input.extension() {
        Some(ext) if ext == "bwz" => input.with_extension(""),
        _ => {
            let mut path = input.as_os_str().to_os_string();
            path.push(".out");
            PathBuf::from(path)
        }
    }
}
