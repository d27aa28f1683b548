use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pipewatch-gateway", version, about = "Pipeline status handler surface")]
pub(crate) struct Args {
    #[arg(long, default_value = "config/gateway.toml")]
    pub(crate) config: PathBuf,
    #[arg(long, default_value = "127.0.0.1:19410")]
    pub(crate) listen_addr: String,
    #[arg(long, default_value_t = false)]
    pub(crate) log_to_stderr: bool,
    /// Also write daily-rolling JSON logs into this directory.
    #[arg(long)]
    pub(crate) log_dir: Option<PathBuf>,
}
