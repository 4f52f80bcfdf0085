use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::{PatgenConfig, CONFIG_FILE_NAME};
use crate::errors::{GenError, Result};

/// Read a config file into memory
pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse and validate config from a TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<PatgenConfig> {
    let config = toml::from_str::<PatgenConfig>(contents)
        .map_err(|e| GenError::Configuration(format!("Failed to parse {CONFIG_FILE_NAME}: {e}")))?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from an explicit path. A missing or broken file is an error.
pub fn load_config_from(path: &Path) -> Result<PatgenConfig> {
    let contents = read_config_file(path).map_err(|e| GenError::FileSystem {
        message: format!("Failed to read config file: {e}"),
        path: Some(path.to_path_buf()),
        source: Some(e),
    })?;
    let config = parse_and_validate_config(&contents)?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Try loading config from a candidate path found during the upward search
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<Result<PatgenConfig>> {
    match read_config_file(config_path) {
        Ok(contents) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(parse_and_validate_config(&contents))
        }
        Err(e) => {
            handle_read_error(config_path, &e);
            None
        }
    }
}

/// Handle file read errors with appropriate logging
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for `patgen.toml`.
///
/// The nearest file wins. When none is found the defaults apply; a file that
/// exists but does not parse or validate is an error.
pub fn load_config(start: &Path) -> Result<PatgenConfig> {
    const MAX_TRAVERSAL_DEPTH: usize = 10;

    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            Ok(PatgenConfig::default())
        })
}
