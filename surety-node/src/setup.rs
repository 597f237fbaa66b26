use std::path::Path;

use tracing::info;

use flight_surety::{Result, SuretyConfig};

/// Writes the default configuration unless a file is already there.
/// Returns `true` when a file was written.
pub fn ensure_config(path: &Path, force: bool) -> Result<bool> {
    if path.exists() && !force {
        info!("Config already present at {}", path.display());
        return Ok(false);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    SuretyConfig::default().save_to_file(path)?;
    info!("✅ Default config written to {}", path.display());
    Ok(true)
}

/// Loads the configuration, falling back to defaults when the file is missing.
pub fn load_or_default(path: &Path) -> Result<SuretyConfig> {
    if path.exists() {
        SuretyConfig::load_from_file(path)
    } else {
        info!("⚠️ No config at {}, using defaults", path.display());
        Ok(SuretyConfig::default())
    }
}
