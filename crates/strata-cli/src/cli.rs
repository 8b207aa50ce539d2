use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "strata",
    about = "Strata — content-addressed block storage",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP gateway
    Serve(ServeArgs),
    /// Ingest a local file and print its CID
    Add(AddArgs),
    /// Stream a stored object to stdout or a file
    Cat(CatArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the bind address
    #[arg(short, long)]
    pub bind: Option<SocketAddr>,

    /// Override the durable data directory
    #[arg(long)]
    pub data_root: Option<PathBuf>,
}

#[derive(Args)]
pub struct AddArgs {
    /// File to ingest
    pub file: PathBuf,

    /// Durable data directory
    #[arg(long, default_value = "data")]
    pub data_root: PathBuf,
}

#[derive(Args)]
pub struct CatArgs {
    /// CID (or `blocks/<cid>` path) to stream
    pub cid: String,

    /// Durable data directory
    #[arg(long, default_value = "data")]
    pub data_root: PathBuf,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
