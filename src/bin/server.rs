use std::{
    net::SocketAddr,
    path::PathBuf,
    sync::Arc,
};

use bushou::{
    core::BushouError,
    dictionary::{
        ensure_data_files,
        HanziDictionary,
    },
    radicals::{
        RadicalTable,
        VariantIndex,
    },
    server::{
        self,
        AppState,
    },
    settings::Settings,
};
use clap::{
    ArgAction,
    Parser,
};
use log::info;
use tokio::net::TcpListener;

#[derive(Parser, Debug)]
#[command(name = "bushou-server", about = "Hanzi decomposition and dictionary query server", version)]
struct Args {
    /// Address to listen on; overrides the saved settings.
    #[arg(long, short = 'b')]
    bind: Option<SocketAddr>,

    /// Directory holding the dictionary sources.
    #[arg(long = "data-dir", short = 'd')]
    data_dir: Option<PathBuf>,

    /// Fail instead of downloading missing dictionary sources.
    #[arg(long = "no-download", action = ArgAction::SetTrue)]
    no_download: bool,
}

#[tokio::main]
async fn main() -> Result<(), BushouError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let settings = Settings::load();

    let data_dir = args.data_dir.unwrap_or_else(|| settings.data_dir());
    let bind = match args.bind {
        Some(addr) => addr,
        None => settings.bind_address.parse().map_err(|e| {
            BushouError::Custom(format!("Invalid bind address {}: {}", settings.bind_address, e))
        })?,
    };

    let radicals = Arc::new(RadicalTable::builtin()?);
    let variants = VariantIndex::build(&radicals);

    let allow_download = !args.no_download;
    let dictionary = tokio::task::spawn_blocking(move || {
        let files = ensure_data_files(&data_dir, allow_download, None)?;
        HanziDictionary::load(&files, &variants)
    })
    .await
    .map_err(|e| BushouError::Custom(format!("Dictionary loading task failed: {}", e)))??;

    info!("Dictionary ready with {} entries", dictionary.entry_count());

    let listener = TcpListener::bind(bind).await?;
    server::serve(listener, AppState::new(Arc::new(dictionary), radicals)).await
}
