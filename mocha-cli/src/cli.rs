use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "mocha", version)]
#[command(about = "Control your smart lights by chatting with a local LLM")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Default, Args)]
pub struct GlobalArgs {
    /// Ollama base URL
    #[arg(long, env = "OLLAMA_HOST", global = true)]
    pub base_url: Option<String>,

    /// Model used for chat
    #[arg(long, env = "MOCHA_MODEL", global = true)]
    pub model: Option<String>,

    /// JSON file describing the lights
    #[arg(long, env = "MOCHA_DEVICES", global = true)]
    pub devices: Option<PathBuf>,

    /// Minimum fuzzy match score (0-100) for device search
    #[arg(long, global = true)]
    pub threshold: Option<f64>,

    /// Maximum model round trips per turn
    #[arg(long, global = true)]
    pub max_steps: Option<usize>,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive chat (default)
    Chat,
    /// List known lights
    Devices,
    /// Fuzzy search lights by name or address
    Search {
        /// Search query
        query: String,
    },
    /// List models available on the Ollama server
    Models,
    /// Serve the chat API over HTTP
    Serve {
        /// Address to bind
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
}
