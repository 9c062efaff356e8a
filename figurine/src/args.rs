use std::path::PathBuf;

use clap::Parser;

/// Figurine generation proxy
#[derive(Debug, Parser)]
#[command(name = "figurine", about = "Turns a photo into a collectible-figure render via Gemini")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "figurine.toml", env = "FIGURINE_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "FIGURINE_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,

    /// Log filter directive, e.g. `info` or `figurine_generate=debug`
    #[arg(long, default_value = "info", env = "FIGURINE_LOG")]
    pub log: String,
}
