//! Output file helpers

use std::borrow::Cow;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::errors::{KgError, Result};

/// Write `path` through a temporary file in the same directory.
///
/// Parent directories are created. The file only appears under its final
/// name once `write` succeeded; on error the temporary file is removed.
pub fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| KgError::file_access(parent, e))?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| KgError::file_access(parent, e))?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }
    tmp.persist(path)
        .map_err(|e| KgError::file_access(path, e.error))?;
    Ok(())
}

/// Replace path separators so a graph label can be used as a file stem
pub fn sanitize_file_stem(label: &str) -> Cow<'_, str> {
    if label.contains(['/', '\\']) {
        Cow::Owned(label.replace(['/', '\\'], "_"))
    } else {
        Cow::Borrowed(label)
    }
}
