//! Where the registry file lives.
//!
//! Precedence: `--registry`, then `CY_ALIAS_REGISTRY` (both handled by clap),
//! then `<data dir>/cy-alias/registry`.

use crate::Result;

use anyhow::anyhow;
use std::path::{Path, PathBuf};

pub const REGISTRY_ENV: &str = "CY_ALIAS_REGISTRY";

const APP_DIR: &str = "cy-alias";
const REGISTRY_FILE: &str = "registry";

/// Default registry location under a platform data directory.
pub fn default_registry_path(data_dir: &Path) -> PathBuf {
    data_dir.join(APP_DIR).join(REGISTRY_FILE)
}

pub fn resolve_registry_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    dirs::data_dir()
        .map(|dir| default_registry_path(&dir))
        .ok_or_else(|| {
            anyhow!(
                "cannot determine a data directory; pass --registry or set {}",
                REGISTRY_ENV
            )
        })
}
