//! Lexical path normalization
//!
//! No symlink resolution: the user-visible form of a path is kept. Relative
//! input is anchored at the working directory, `.` is dropped, `..` pops a
//! component, and trailing separators disappear. Surrounding whitespace is
//! kept as part of the name. Only Windows paths are case-folded; macOS
//! volumes may be formatted case-sensitive, so their case is kept.

use crate::error::RegistryError;
use std::path::{Component, Path, PathBuf};

/// Normalize `raw` into the canonical string key used by the registry
pub fn normalize_path(raw: &str) -> Result<String, RegistryError> {
    if raw.trim().is_empty() {
        return Err(RegistryError::invalid_path(raw, "path is empty"));
    }

    // Surrounding whitespace is part of the name
    let input = Path::new(raw);
    let absolute = if input.is_absolute() {
        input.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| RegistryError::io(input, e))?
            .join(input)
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                normalized.push(component.as_os_str())
            }
            Component::CurDir => {}
            Component::ParentDir => {
                // Never pops past the root
                if normalized.parent().is_some() {
                    normalized.pop();
                }
            }
        }
    }

    let key = normalized.to_string_lossy().into_owned();
    Ok(fold_case(key))
}

#[cfg(windows)]
fn fold_case(path: String) -> String {
    path.to_lowercase()
}

#[cfg(not(windows))]
fn fold_case(path: String) -> String {
    path
}

/// Normalize and require an existing directory
pub fn existing_directory(raw: &str) -> Result<String, RegistryError> {
    let normalized = normalize_path(raw)?;
    if !Path::new(&normalized).is_dir() {
        return Err(RegistryError::invalid_path(raw, "not an existing directory"));
    }
    Ok(normalized)
}
