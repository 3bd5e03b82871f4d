//! Vehicle side of the link: listens for sealed command frames, validates
//! them, and ramps the motor channels. With no motor hardware attached the
//! channels log the H-bridge pin states they would drive.

use std::time::Duration;

use structopt::StructOpt;
use tokio::net::UdpSocket;

use runtime::{
    DriveRuntime,
    RampConfig,
    RuntimeConfig,
};
use tanklink::{
    key,
    motor::LogChannel,
    trace,
};

mod options;

use options::Options;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    trace::init();

    let options = Options::from_args();
    let link_key = key::parse(&options.key)?;

    let socket = UdpSocket::bind(options.listen).await?;
    tracing::info!(listen = %socket.local_addr()?, "drive link listening");

    let config = RuntimeConfig {
        command_timeout: Duration::from_millis(options.timeout_ms),
        ramp: RampConfig {
            step:     options.ramp_step,
            interval: Duration::from_millis(options.ramp_interval_ms),
        },
        ..RuntimeConfig::default()
    };

    let mut runtime = DriveRuntime::new(
        socket,
        link_key,
        LogChannel::new("left"),
        LogChannel::new("right"),
        config,
    );

    runtime.run().await;

    Ok(())
}
