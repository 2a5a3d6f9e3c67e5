//! `bwzip compress` implementation.

use crate::utils::{create_progress_bar, format_size};
use bwzip::{BwzEncoder, CompressionLevel};
use bwzip_core::Result;
use std::fs::File;
use std::io::{BufWriter, Read};
use std::path::{Path, PathBuf};

/// Compress `input` into a `.bwz` stream.
pub fn cmd_compress(
    input: &Path,
    output: Option<&Path>,
    level: u8,
    progress: bool,
) -> Result<()> {
    let level = CompressionLevel::new(level);
    let output_path = match output {
        Some(path) => path.to_path_buf(),
        None => default_output_path(input),
    };

    let mut reader = File::open(input)?;
    let input_len = reader.metadata()?.len();
    let writer = BufWriter::new(File::create(&output_path)?);

    let mut encoder = BwzEncoder::new(writer, level)?;
    let pb = create_progress_bar(input_len, progress && input_len > level.block_size() as u64);

    // Feed one block at a time so the bar moves while large files grind
    // through the rotation sort.
    let mut block = vec![0u8; level.block_size()];
    let mut total_read = 0u64;
    loop {
        let n = read_full(&mut reader, &mut block)?;
        if n == 0 {
            break;
        }
        encoder.write_block(&block[..n])?;
        total_read += n as u64;
        pb.set_position(total_read);
    }

    encoder.finish()?;
    pb.finish_and_clear();

    let output_len = std::fs::metadata(&output_path)?.len();
    let ratio = if input_len > 0 {
        output_len as f64 / input_len as f64 * 100.0
    } else {
        100.0
    };
    println!(
        "{} -> {} ({} -> {}, {:.1}%)",
        input.display(),
        output_path.display(),
        format_size(input_len),
        format_size(output_len),
        ratio
    );

    Ok(())
}

fn default_output_path(input: &Path) -> PathBuf {
    let mut path = input.as_os_str().to_os_string();
    path.push(".bwz");
    PathBuf::from(path)
}

/// Read until `buf` is full or the reader is exhausted.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("data.txt")),
            PathBuf::from("data.txt.bwz")
        );
    }

    #[test]
    fn test_read_full_short_input() {
        let mut cursor = std::io::Cursor::new(b"abc".to_vec());
        let mut buf = [0u8; 8];
        assert_eq!(read_full(&mut cursor, &mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], b"abc");
    }
}
