//! Headless promptrepo server.
//!
//! Opens the prompt library and serves it over HTTP until Ctrl-C.

use clap::Parser;
use promptrepo_core::{paths, PromptStore};
use promptrepo_http::SharedState;
use std::error::Error;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

/// Serve a promptrepo library over HTTP.
#[derive(Debug, Parser)]
#[command(name = "promptrepo-daemon")]
#[command(version, about, long_about = None)]
struct Args {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = 5003)]
    port: u16,

    /// Data file. Defaults to `prompts.json` under the promptrepo home.
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Directory with a static web UI, served for non-API paths.
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

impl Args {
    fn addr(&self) -> Result<SocketAddr, Box<dyn Error>> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    fn data_file(&self) -> Result<PathBuf, Box<dyn Error>> {
        match &self.data_file {
            Some(path) => Ok(path.clone()),
            None => Ok(paths::default_data_file()?),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let addr = args.addr()?;
    let data_file = args.data_file()?;

    let store = PromptStore::open(&data_file)?;
    log::info!("Using data file {}", store.path().display());

    let state = Arc::new(SharedState::new(Arc::new(store)));
    promptrepo_http::serve(state, addr, args.static_dir, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C: {e}");
        }
    })
    .await?;

    Ok(())
}
