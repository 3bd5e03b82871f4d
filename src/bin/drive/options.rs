use std::net::SocketAddr;

#[derive(Debug, Clone, structopt::StructOpt)]
pub struct Options {
    /// Address to listen on for sealed command frames.
    #[structopt(long, default_value = "0.0.0.0:4747")]
    pub listen: SocketAddr,

    /// Shared link key, 64 hex digits.
    #[structopt(long, env = "TANKLINK_KEY", hide_env_values = true)]
    pub key: String,

    /// Force a stop after this long without a valid command, in milliseconds.
    #[structopt(long, default_value = "2000")]
    pub timeout_ms: u64,

    /// Largest PWM change per ramp tick.
    #[structopt(long, default_value = "10")]
    pub ramp_step: i16,

    /// Minimum milliseconds between ramp ticks.
    #[structopt(long, default_value = "10")]
    pub ramp_interval_ms: u64,
}
