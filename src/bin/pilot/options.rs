use std::{
    net::SocketAddr,
    time::Duration,
};

#[derive(Debug, Clone, structopt::StructOpt)]
pub struct Options {
    /// Address the drive side listens on.
    #[structopt(long)]
    pub target: SocketAddr,

    /// Shared link key, 64 hex digits.
    #[structopt(long, env = "TANKLINK_KEY", hide_env_values = true)]
    pub key: String,

    /// How often the last command is re-issued, in milliseconds.
    #[structopt(long, default_value = "500")]
    pub reissue_ms: u64,
}

impl Options {
    pub fn reissue_interval(&self) -> Duration {
        Duration::from_millis(self.reissue_ms)
    }
}
