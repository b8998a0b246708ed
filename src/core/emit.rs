//! RU-008: Artifact writing — atomic write, script and unit emission.

use super::types::Generation;
use crate::error::{Error, Result};
use clap::ValueEnum;
use std::path::{Path, PathBuf};

/// What to do when a script file cannot be written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ScriptWritePolicy {
    /// Abort the run
    #[default]
    Fatal,
    /// Log a warning and keep going
    Warn,
}

/// Write a file atomically (write to temp, then rename).
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    std::fs::write(&tmp_path, content).map_err(|e| Error::io(&tmp_path, e))?;
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(Error::io(path, e));
    }
    Ok(())
}

/// Write every script in order, then the unit file if one was generated.
///
/// Returns the paths that were written.
pub fn write_generation(
    generation: &Generation,
    out_dir: &Path,
    on_script_error: ScriptWritePolicy,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    for script in &generation.scripts {
        let path = out_dir.join(&script.file_name);
        match write_atomic(&path, &script.content) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "script file generated");
                written.push(path);
            }
            Err(e) if on_script_error == ScriptWritePolicy::Warn => {
                tracing::warn!(error = %e, "script file not written");
            }
            Err(e) => return Err(e),
        }
    }

    if let Some(unit) = &generation.unit {
        let path = out_dir.join(&unit.file_name);
        write_atomic(&path, &unit.content)?;
        tracing::info!(path = %path.display(), "unit file generated");
        written.push(path);
    }

    Ok(written)
}
