use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;

/// AssetGen image generation gateway
#[derive(Debug, Parser)]
#[command(name = "assetgen", about = "Generate images from prompts and serve them as static assets")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "assetgen.toml", env = "ASSETGEN_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "ASSETGEN_LISTEN")]
    pub listen: Option<SocketAddr>,
}
