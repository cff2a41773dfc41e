use std::{
    fs::{
        self,
        File,
    },
    io::{
        self,
        BufWriter,
        Read,
        Write,
    },
    path::{
        Path,
        PathBuf,
    },
};

use log::info;
use zip::ZipArchive;

use super::{
    cedict::CEDICT_FILE,
    decomposition::DECOMPOSITION_FILE,
    frequency::FREQUENCY_FILE,
};
use crate::core::{
    http::{
        download_client,
        download_to_file,
    },
    BushouError,
};

pub const CEDICT_URL: &str = "https://www.mdbg.net/chinese/export/cedict/cedict_1_0_ts_utf-8_mdbg.zip";
pub const DECOMPOSITION_URL: &str =
    "https://raw.githubusercontent.com/amake/cjk-decomp/master/cjk-decomp.txt";

pub type ProgressCallback = Box<dyn Fn(String) + Send>;

/// Source files the dictionary engine is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFiles {
    pub cedict: PathBuf,
    pub decomposition: PathBuf,
    pub frequency: Option<PathBuf>, // user supplied, never downloaded
}

impl DataFiles {
    pub fn in_dir(dir: &Path) -> Self {
        let frequency = dir.join(FREQUENCY_FILE);
        Self {
            cedict: dir.join(CEDICT_FILE),
            decomposition: dir.join(DECOMPOSITION_FILE),
            frequency: frequency.exists().then_some(frequency),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.cedict.exists() && self.decomposition.exists()
    }
}

/// Makes sure the dictionary sources exist in `dir`, downloading the missing
/// ones unless `allow_download` is false.
pub fn ensure_data_files(
    dir: &Path,
    allow_download: bool,
    progress_callback: Option<ProgressCallback>,
) -> Result<DataFiles, BushouError> {
    fs::create_dir_all(dir).map_err(|e| {
        BushouError::Custom(format!("Failed to create data directory {:?}: {}", dir, e))
    })?;

    let files = DataFiles::in_dir(dir);
    if files.is_complete() {
        callback_message("Dictionary data already present", &progress_callback);
        return Ok(files);
    }

    if !allow_download {
        let missing = [&files.cedict, &files.decomposition]
            .into_iter()
            .filter(|p| !p.exists())
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(BushouError::MissingDataFile(missing));
    }

    let client = download_client()?;

    if !files.cedict.exists() {
        let zip_path = dir.join("cedict.zip");
        fs::remove_file(&zip_path).ok();

        callback_message("Downloading CC-CEDICT...", &progress_callback);
        download_to_file(&client, CEDICT_URL, &zip_path)?;

        callback_message("Extracting CC-CEDICT...", &progress_callback);
        extract_cedict(&zip_path, &files.cedict)?;

        info!("Removing download {:?}", zip_path);
        fs::remove_file(&zip_path)?;
    }

    if !files.decomposition.exists() {
        let part_path = files.decomposition.with_extension("txt.part");
        callback_message("Downloading decomposition data...", &progress_callback);
        download_to_file(&client, DECOMPOSITION_URL, &part_path)?;
        fs::rename(&part_path, &files.decomposition)?;
    }

    callback_message("Dictionary data ready", &progress_callback);
    Ok(DataFiles::in_dir(dir))
}

/// Copies the CC-CEDICT text file out of the MDBG archive. The text is
/// written next to `target` and only renamed into place once complete.
pub fn extract_cedict(zip_path: &Path, target: &Path) -> Result<(), BushouError> {
    let file = File::open(zip_path)
        .map_err(|e| BushouError::Custom(format!("Failed to open zip file: {}", e)))?;
    let mut archive = ZipArchive::new(file)?;

    let name = archive
        .file_names()
        .find(|name| name.ends_with(CEDICT_FILE) || name.ends_with(".u8"))
        .map(str::to_string)
        .ok_or_else(|| BushouError::Custom(format!("No CC-CEDICT file in {:?}", zip_path)))?;

    let mut entry = archive.by_name(&name)?;
    let part_path = target.with_extension("u8.part");
    if let Err(e) = copy_to_file(&mut entry, &part_path) {
        fs::remove_file(&part_path).ok();
        return Err(e);
    }
    fs::rename(&part_path, target)?;
    Ok(())
}

fn copy_to_file(reader: &mut impl Read, path: &Path) -> Result<(), BushouError> {
    let mut writer = BufWriter::new(File::create(path)?);
    io::copy(reader, &mut writer)?;
    writer.flush()?;
    Ok(())
}

fn callback_message(message: &str, callback: &Option<ProgressCallback>) {
    info!("{}", message);
    if let Some(cb) = callback {
        cb(message.to_string());
    }
}
