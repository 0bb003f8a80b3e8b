//! Capability-scoped file reads.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io;

/// Reads a UTF-8 file through a handle on its parent directory.
pub(crate) fn read_to_string(path: &Utf8Path) -> io::Result<String> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("path '{path}' does not name a file"),
        )
    })?;
    let parent = path
        .parent()
        .filter(|candidate| !candidate.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.read_to_string(file_name)
}
