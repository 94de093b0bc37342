// persistence.rs

use std::fs;
use std::path::Path;

use crate::calculation::Calculation;
use crate::codec;
use crate::error::PersistenceError;

pub const HISTORY_FILE_NAME: &str = "calculator_history.csv";

fn ensure_parent_dir(path: &Path) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PersistenceError::io(parent, e))?;
    }
    Ok(())
}

/// Write to a sibling temp file, then rename over `path`.
fn write_atomic(path: &Path, data: &[u8]) -> Result<(), PersistenceError> {
    ensure_parent_dir(path)?;
    let tmp = path.with_extension("csv.tmp");
    fs::write(&tmp, data).map_err(|e| PersistenceError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        PersistenceError::io(path, e)
    })
}

pub fn save(path: &Path, entries: &[Calculation]) -> Result<(), PersistenceError> {
    let data = codec::encode(entries)?;
    write_atomic(path, &data)?;
    tracing::debug!(path = %path.display(), rows = entries.len(), "history written");
    Ok(())
}

pub fn load(path: &Path) -> Result<Vec<Calculation>, PersistenceError> {
    if !path.exists() {
        return Err(PersistenceError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let data = fs::read(path).map_err(|e| PersistenceError::io(path, e))?;
    codec::decode(&data)
}
