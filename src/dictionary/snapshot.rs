use std::{
    fs::{
        self,
        File,
    },
    io::{
        BufReader,
        Read,
        Write,
    },
    path::Path,
    time::UNIX_EPOCH,
};

use serde::{
    de::DeserializeOwned,
    Deserialize,
    Serialize,
};

use crate::core::BushouError;

pub const SNAPSHOT_FILE: &str = "hanzi.snapshot.bin";

/// Size and modification time of each source file a snapshot was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    sources: Vec<(String, u64, u64)>,
}

impl Fingerprint {
    pub fn of(paths: &[&Path]) -> Result<Self, BushouError> {
        let mut sources = Vec::with_capacity(paths.len());
        for path in paths {
            let metadata = fs::metadata(path)?;
            let modified = metadata
                .modified()
                .ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map_or(0, |d| d.as_secs());
            let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
            sources.push((name, metadata.len(), modified));
        }
        Ok(Self { sources })
    }
}

#[derive(Serialize, Deserialize)]
struct Snapshot<T> {
    fingerprint: Fingerprint,
    data: T,
}

/// Returns the snapshot data when it exists and was built from the same sources.
pub fn load<T: DeserializeOwned>(path: &Path, fingerprint: &Fingerprint) -> Result<Option<T>, BushouError> {
    if !path.exists() {
        return Ok(None);
    }

    let mut reader = BufReader::new(File::open(path)?);
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    let (snapshot, _): (Snapshot<T>, usize) =
        bincode::serde::decode_from_slice(&buffer, bincode::config::standard())?;

    if &snapshot.fingerprint != fingerprint {
        return Ok(None);
    }
    Ok(Some(snapshot.data))
}

pub fn save<T: Serialize>(path: &Path, fingerprint: &Fingerprint, data: &T) -> Result<(), BushouError> {
    #[derive(Serialize)]
    struct SnapshotRef<'a, T> {
        fingerprint: &'a Fingerprint,
        data: &'a T,
    }

    let encoded = bincode::serde::encode_to_vec(
        SnapshotRef { fingerprint, data },
        bincode::config::standard(),
    )?;

    let tmp = path.with_extension("bin.tmp");
    let mut file = File::create(&tmp)?;
    file.write_all(&encoded)?;
    file.sync_all()?;
    fs::rename(&tmp, path)?;
    Ok(())
}
