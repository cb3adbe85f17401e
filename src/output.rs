use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{ExtractError, Result};

/// Write `value` as 2-space-indented JSON via a temporary file in the target
/// directory that is renamed into place.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<u64> {
    let bytes = serde_json::to_vec_pretty(value)?;
    write_atomic(path, &bytes)?;
    info!("Saved {:?} ({:.2} MB)", path, bytes.len() as f64 / (1024.0 * 1024.0));
    Ok(bytes.len() as u64)
}

pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let output_err = |source| ExtractError::Output {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let tmp = NamedTempFile::new_in(dir).map_err(output_err)?;
    {
        let mut w = BufWriter::new(tmp.as_file());
        w.write_all(bytes).map_err(output_err)?;
        w.flush().map_err(output_err)?;
    }
    tmp.as_file().sync_all().map_err(output_err)?;
    tmp.persist(path).map_err(|e| output_err(e.error))?;
    Ok(())
}

// ── Tests ──
