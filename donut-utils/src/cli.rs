use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{
    Settings, BASE_URL, DEFAULT_API_TIMEOUT_SECS, DEFAULT_PAUSE_SECS, REPOS_LIST,
};

#[derive(Parser, Debug, Clone)]
#[clap(
    name = "donut-utils",
    version,
    about = "Download the donut-utils tools for this platform and add them to PATH",
    long_about = None
)]
pub struct Args {
    /// File listing one owner/repo per line
    #[clap(long, value_name = "PATH", default_value = REPOS_LIST)]
    pub list: PathBuf,

    /// Base URL of the repositories API
    #[clap(long, env = "DONUT_API_URL", default_value = BASE_URL)]
    pub api_url: String,

    /// GitHub token sent with API requests
    #[clap(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Seconds to wait after the banner before starting
    #[clap(long, value_name = "SECONDS", default_value_t = DEFAULT_PAUSE_SECS)]
    pub pause: u64,

    /// Seconds allowed for each API request
    #[clap(long, value_name = "SECONDS", default_value_t = DEFAULT_API_TIMEOUT_SECS)]
    pub api_timeout: u64,

    /// Enable verbose output
    #[clap(long)]
    pub verbose: bool,
}

impl Args {
    pub fn settings(&self) -> Settings {
        Settings {
            repo_list: self.list.clone(),
            api_url: self.api_url.clone(),
            token: self.token.clone().filter(|t| !t.is_empty()),
            pause: Duration::from_secs(self.pause),
            api_timeout: Duration::from_secs(self.api_timeout),
        }
    }
}
