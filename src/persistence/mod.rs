pub mod store;

use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use log::{
    info,
    warn,
};
use serde::{
    Deserialize,
    Serialize,
};

pub use store::{
    FileStore,
    KeyValueStore,
};

use crate::core::BushouError;

const APP_NAME: &str = "bushou";

pub fn get_app_data_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        let app_dir = data_dir.join(APP_NAME);
        let _ = fs::create_dir_all(&app_dir);
        app_dir
    } else {
        PathBuf::from(".")
    }
}

pub fn get_data_file_path(filename: &str) -> PathBuf {
    get_app_data_dir().join(filename)
}

/// Writes `data` as pretty JSON through a temp file so readers never see a
/// half-written document.
pub fn write_json_atomic<T: Serialize + ?Sized>(data: &T, path: &Path) -> Result<(), BushouError> {
    let json = serde_json::to_string_pretty(data)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn save_json<T: Serialize>(data: &T, filename: &str) -> Result<(), BushouError> {
    let file_path = get_data_file_path(filename);
    write_json_atomic(data, &file_path)?;
    info!("Data saved to: {}", file_path.display());
    Ok(())
}

pub fn load_json_from<T: for<'de> Deserialize<'de> + Default>(path: &Path) -> Result<T, BushouError> {
    if !path.exists() {
        return Ok(T::default());
    }

    let json = fs::read_to_string(path)?;
    let data: T = serde_json::from_str(&json)?;
    info!("Data loaded from: {}", path.display());
    Ok(data)
}

pub fn load_json<T: for<'de> Deserialize<'de> + Default>(filename: &str) -> Result<T, BushouError> {
    load_json_from(&get_data_file_path(filename))
}

pub fn load_json_or_default<T: for<'de> Deserialize<'de> + Default>(filename: &str) -> T {
    match load_json::<T>(filename) {
        Ok(data) => data,
        Err(e) => {
            warn!("Failed to load {}: {}. Using defaults.", filename, e);
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn test_atomic_write_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");

        let data = BTreeMap::from([("a".to_string(), 1u32), ("b".to_string(), 2)]);
        write_json_atomic(&data, &path).unwrap();

        let loaded: BTreeMap<String, u32> = load_json_from(&path).unwrap();
        assert_eq!(loaded, data);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded: Vec<u32> = load_json_from(&dir.path().join("absent.json")).unwrap();
        assert!(loaded.is_empty());
    }
}
