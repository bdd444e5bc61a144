// Copyright (c) 2024 Mike Tsao

//! Picks auto-numbered output filenames like `midis/midi7.mid`.

use std::{
    ffi::OsString,
    fs::{File, OpenOptions},
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// Builds `<dir>/<base><index><extension>`.
pub fn numbered_path(dir: &Path, base: &str, index: usize, extension: &str) -> PathBuf {
    dir.join(format!("{base}{index}{extension}"))
}

/// Returns the first numbered path, counting from 1, that doesn't exist right
/// now. Nothing is reserved, so another writer can take the path before the
/// caller gets to it. Use [claim_numbered_file()] to actually write.
pub fn next_available_path(dir: &Path, base: &str, extension: &str) -> PathBuf {
    (1..)
        .map(|index| numbered_path(dir, base, index, extension))
        .find(|path| !path.exists())
        .unwrap_or_else(|| dir.join(format!("{base}{extension}")))
}

/// Creates the first numbered file, counting from 1, that doesn't already
/// exist, and returns it open for writing.
///
/// Each candidate is opened with create-new semantics, so if two writers race
/// for the same index, exactly one wins and the other moves on to the next
/// index. An existing file is never truncated. The directory must already
/// exist.
pub fn claim_numbered_file(
    dir: &Path,
    base: &str,
    extension: &str,
) -> std::io::Result<(PathBuf, File)> {
    let mut index = 1;
    loop {
        let path = numbered_path(dir, base, index, extension);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                log::debug!("{} is taken", path.display());
                index += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Removes a half-written file after a failed write. A failure to remove it
/// is logged, since the caller is already reporting the original error.
pub fn discard_partial(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        log::warn!("couldn't remove partial file {}: {e}", path.display());
    }
}

/// The sibling path a file is staged at before it's renamed into place, e.g.
/// `waves/out.wav.partial` for `waves/out.wav`.
pub fn partial_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(OsString::new);
    name.push(".partial");
    path.with_file_name(name)
}
