//! Operator side of the link: reads command lines from stdin, seals and
//! sends them, and re-issues the last command periodically so the vehicle's
//! watchdog stays fed while a command is meant to be in force.

use structopt::StructOpt;
use tokio::{
    io::{
        AsyncBufReadExt,
        BufReader,
    },
    net::UdpSocket,
    time,
};

use message::Command;
use runtime::CommandSender;
use tanklink::{
    console,
    key,
    trace,
};

mod options;

use options::Options;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    trace::init();

    let options = Options::from_args();
    let link_key = key::parse(&options.key)?;

    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    socket.connect(options.target).await?;
    tracing::info!(peer = %options.target, "pilot link up");

    let mut sender = CommandSender::new(socket, link_key);
    let mut last: Option<(Command, u8, u8)> = None;

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let mut reissue = time::interval(options.reissue_interval());

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }

                match console::parse_command(&line) {
                    Ok((command, left, right)) => {
                        if let Err(e) = sender.send(command, left, right).await {
                            tracing::error!(error = %e, "send failed");
                        }
                        last = Some((command, left, right));
                    }
                    Err(e) => tracing::warn!(error = %e, "unrecognized command"),
                }
            }

            _ = reissue.tick() => {
                if let Some((command, left, right)) = last {
                    if let Err(e) = sender.send(command, left, right).await {
                        tracing::error!(error = %e, "re-issue failed");
                    }
                }
            }
        }
    }

    tracing::info!("stdin closed, pilot shutting down");
    Ok(())
}
