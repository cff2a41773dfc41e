use thiserror::Error;

#[derive(Error, Debug)]
pub enum BushouError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(Box<reqwest::Error>),

    #[error("Zip error: {0}")]
    Zip(Box<zip::result::ZipError>),

    #[error("Snapshot encode error: {0}")]
    SnapshotEncode(Box<bincode::error::EncodeError>),

    #[error("Snapshot decode error: {0}")]
    SnapshotDecode(Box<bincode::error::DecodeError>),

    #[error("Invalid radical table: {0}")]
    InvalidRadicalTable(String),

    #[error("Missing data file: {0}")]
    MissingDataFile(String),

    #[error("BushouError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for BushouError {
    fn from(error: std::io::Error) -> Self {
        BushouError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for BushouError {
    fn from(error: reqwest::Error) -> Self {
        BushouError::Reqwest(Box::new(error))
    }
}

impl From<zip::result::ZipError> for BushouError {
    fn from(error: zip::result::ZipError) -> Self {
        BushouError::Zip(Box::new(error))
    }
}

impl From<bincode::error::EncodeError> for BushouError {
    fn from(error: bincode::error::EncodeError) -> Self {
        BushouError::SnapshotEncode(Box::new(error))
    }
}

impl From<bincode::error::DecodeError> for BushouError {
    fn from(error: bincode::error::DecodeError) -> Self {
        BushouError::SnapshotDecode(Box::new(error))
    }
}
