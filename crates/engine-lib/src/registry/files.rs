//! File-level side effects: create and remove single files

use super::path::existing_directory;
use crate::error::RegistryError;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};
use tracing::info;

/// Create `file_name` inside `directory` with `content` (empty when absent).
///
/// With `allow_overwrite` unset the file is opened create-new, so an
/// existing file is never touched.
pub fn create_file(
    directory: &str,
    file_name: &str,
    content: Option<&str>,
    allow_overwrite: bool,
) -> Result<PathBuf, RegistryError> {
    let dir = existing_directory(directory)?;
    validate_file_name(file_name)?;

    let target = Path::new(&dir).join(file_name);

    let mut options = OpenOptions::new();
    options.write(true);
    if allow_overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    let mut file = options.open(&target).map_err(|e| match e.kind() {
        ErrorKind::AlreadyExists => RegistryError::FileAlreadyExists(target.clone()),
        _ => RegistryError::io(&target, e),
    })?;

    file.write_all(content.unwrap_or_default().as_bytes())
        .and_then(|_| file.sync_all())
        .map_err(|e| RegistryError::io(&target, e))?;

    info!(event = "file_created", path = %target.display(), "File created");
    Ok(target)
}

/// Delete the file at `file_path`
pub fn remove_file(file_path: &str) -> Result<(), RegistryError> {
    if file_path.trim().is_empty() {
        return Err(RegistryError::invalid_path(file_path, "path is empty"));
    }
    let path = Path::new(file_path);

    let metadata = fs::symlink_metadata(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => RegistryError::FileNotFound(path.to_path_buf()),
        _ => RegistryError::io(path, e),
    })?;

    if metadata.is_dir() {
        return Err(RegistryError::io(
            path,
            std::io::Error::new(ErrorKind::Other, "path is a directory"),
        ));
    }

    fs::remove_file(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => RegistryError::FileNotFound(path.to_path_buf()),
        _ => RegistryError::io(path, e),
    })?;

    info!(event = "file_removed", path = %path.display(), "File removed");
    Ok(())
}

fn validate_file_name(file_name: &str) -> Result<(), RegistryError> {
    let mut components = Path::new(file_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !file_name.ends_with(['/', '\\']) => Ok(()),
        _ => Err(RegistryError::invalid_path(
            file_name,
            "file name must be a single path component",
        )),
    }
}
