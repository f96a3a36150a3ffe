use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ConfigurationError, ConfigurationErrorExt};
use crate::plugins::{ResourceLoader, ResourceSaver};

const FILE_SCHEME: &str = "file://";

/// Local path of a plain path or `file://` URI; `None` for any other scheme.
#[must_use]
pub fn local_path(uri: &str) -> Option<PathBuf> {
    if let Some(rest) = uri.strip_prefix(FILE_SCHEME) {
        // `file://localhost/x` and `file:///x` both address `/x`.
        let rest = rest.strip_prefix("localhost").unwrap_or(rest);
        return (!rest.is_empty()).then(|| PathBuf::from(rest));
    }
    if uri.is_empty() || uri.contains("://") {
        return None;
    }
    Some(PathBuf::from(uri))
}

/// Loads existing local files.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileResourceLoader;

impl ResourceLoader for FileResourceLoader {
    fn can_load(&self, uri: &str) -> bool {
        local_path(uri).is_some_and(|path| path.is_file())
    }

    fn load(&self, uri: &str) -> Result<Vec<u8>, ConfigurationError> {
        let path = require_local(uri)?;
        let data = fs::read(&path).context(format!("Reading {}", path.display()))?;
        debug!(path = %path.display(), bytes = data.len(), "Loaded configuration resource");
        Ok(data)
    }
}

/// Saves to local files, creating missing parent folders.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileResourceSaver;

impl ResourceSaver for FileResourceSaver {
    fn can_save(&self, uri: &str) -> bool {
        local_path(uri).is_some()
    }

    fn save(&self, uri: &str, data: &[u8]) -> Result<(), ConfigurationError> {
        let path = require_local(uri)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context(format!("Creating {}", parent.display()))?;
        }

        write_replacing(&path, data)?;
        debug!(path = %path.display(), bytes = data.len(), "Saved configuration resource");
        Ok(())
    }
}

fn require_local(uri: &str) -> Result<PathBuf, ConfigurationError> {
    local_path(uri).ok_or_else(|| ConfigurationError::not_supported(format!("Not a local file URI: {uri}")))
}

/// Writes next to `path` first so a failed write never leaves a truncated configuration behind.
fn write_replacing(path: &Path, data: &[u8]) -> Result<(), ConfigurationError> {
    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);

    fs::write(&staging, data).context(format!("Writing {}", staging.display()))?;
    fs::rename(&staging, path)
        .inspect_err(|_| {
            let _ = fs::remove_file(&staging);
        })
        .context(format!("Replacing {}", path.display()))?;
    Ok(())
}
