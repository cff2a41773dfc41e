use std::{
    fs::{
        self,
        File,
    },
    io::{
        BufWriter,
        Write,
    },
    path::Path,
    time::Duration,
};

use log::{
    info,
    warn,
};
use reqwest::{
    blocking::{
        Client,
        Response,
    },
    header::{
        ACCEPT_ENCODING,
        USER_AGENT,
    },
};

use crate::core::BushouError;

const DOWNLOAD_ATTEMPTS: usize = 3;
const AGENT: &str = concat!("bushou/", env!("CARGO_PKG_VERSION"), " (+reqwest)");

/// Blocking client used for the one-off data downloads.
pub fn download_client() -> Result<Client, BushouError> {
    Client::builder()
        .timeout(Duration::from_secs(120))
        .build()
        .map_err(|e| BushouError::Custom(format!("HTTP client build failed: {e}")))
}

/// Async client used by the query API client.
pub fn api_client(timeout: Duration) -> Result<reqwest::Client, BushouError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(AGENT)
        .build()
        .map_err(|e| BushouError::Custom(format!("HTTP client build failed: {e}")))
}

/// Downloads `url` into `path`, retrying transient failures with a linear backoff.
/// A partially written file is removed before each retry.
pub fn download_to_file(client: &Client, url: &str, path: &Path) -> Result<u64, BushouError> {
    let mut attempt: usize = 0;
    loop {
        attempt += 1;

        match try_download(client, url, path) {
            Ok(bytes) => {
                info!("Downloaded {} bytes from {}", bytes, url);
                return Ok(bytes);
            }
            Err(e) if attempt < DOWNLOAD_ATTEMPTS => {
                warn!("Download attempt {} of {} failed: {}", attempt, url, e);
                fs::remove_file(path).ok();
                std::thread::sleep(Duration::from_secs(2 * attempt as u64));
            }
            Err(e) => {
                fs::remove_file(path).ok();
                return Err(e);
            }
        }
    }
}

fn try_download(client: &Client, url: &str, path: &Path) -> Result<u64, BushouError> {
    let mut resp = client
        .get(url)
        .header(USER_AGENT, AGENT)
        .header(ACCEPT_ENCODING, "identity")
        .send()
        .map_err(|e| BushouError::Custom(format!("Failed HTTP GET {}: {}", url, e)))?;

    ensure_success(&resp)?;

    let mut writer = BufWriter::new(File::create(path).map_err(|e| {
        BushouError::Custom(format!("Create download file {:?} failed: {}", path, e))
    })?);

    let bytes = resp.copy_to(&mut writer)?;
    writer.flush()?;

    if bytes == 0 {
        return Err(BushouError::Custom(format!("Empty response body from {}", url)));
    }
    Ok(bytes)
}

fn ensure_success(resp: &Response) -> Result<(), BushouError> {
    if !resp.status().is_success() {
        return Err(BushouError::Custom(format!(
            "HTTP error {} from {}",
            resp.status(),
            resp.url()
        )));
    }
    Ok(())
}
