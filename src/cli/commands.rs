use crate::storage::DEFAULT_RESULTS_DIR;
use clap::Parser;
use std::path::PathBuf;

/// Command-line interface for the result receiver
///
/// `PORT` is read from the environment separately (see
/// [`crate::runtime_config`]) so that an empty value falls back to the default.
#[derive(Parser, Debug, Clone)]
#[command(name = "xubit-receiver")]
#[command(about = "Accepts JSON computation results over HTTP and stores them on disk", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Host or IP address to bind
    #[arg(long, env = "XUBIT_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Listen port; overrides the PORT environment variable when given
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory that accepted results are written into
    #[arg(long, env = "XUBIT_RESULTS_DIR", default_value = DEFAULT_RESULTS_DIR)]
    pub results_dir: PathBuf,
}
