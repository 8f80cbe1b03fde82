//! Writing finished buffers to disk.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::{Error, Result};

/// Suffix of the blosc-compressed container variant.
pub const COMPRESSED_SUFFIX: &str = ".bgeo.sc";

/// True if the path names the compressed `.bgeo.sc` container.
pub fn is_compressed_path(path: &Path) -> bool {
    path.to_string_lossy().ends_with(COMPRESSED_SUFFIX)
}

/// Write a serialized buffer to `path`, creating parent directories.
///
/// The compressed container is refused before anything is created on disk.
pub fn write_file(path: impl AsRef<Path>, data: &[u8]) -> Result<()> {
    let path = path.as_ref();
    if is_compressed_path(path) {
        return Err(Error::CompressionUnavailable(path.to_path_buf()));
    }

    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(data)?;
    writer.flush()?;

    tracing::debug!("wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}
