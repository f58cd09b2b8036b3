use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gs-download")]
#[command(author, version, about = "Download every file listed by a file host", long_about = None)]
#[command(disable_help_flag = true)]
pub struct Args {
    /// Host name or IP address
    #[arg(short = 'h', long, default_value = "localhost")]
    pub host: String,

    /// Port number
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    /// Target directory for downloaded files
    #[arg(short, long, default_value = ".")]
    pub target: PathBuf,

    /// Directory for the rotating log file
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Display this help message
    #[arg(short = '?', long, action = ArgAction::Help)]
    pub help: Option<bool>,
}

impl Args {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn manifest_url(&self) -> String {
        format!("{}/files", self.base_url())
    }
}
