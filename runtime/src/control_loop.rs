use std::time::{
    Duration,
    Instant,
};

use codec::KEY_SIZE;
use net::FrameReceiver;

use crate::{
    drive::{
        Drive,
        MotorChannel,
        RampConfig,
    },
    receiver::CommandReceiver,
};

/// Upper bound on frames validated per scheduler pass, so a flooding sender
/// cannot starve the ramp update.
const MAX_FRAMES_PER_POLL: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Scheduler passes per second when driven by [`DriveRuntime::run`].
    pub loop_hz:         u64,
    /// How long the vehicle keeps moving without a fresh valid command.
    pub command_timeout: Duration,
    pub ramp:            RampConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            loop_hz:         50,
            command_timeout: Duration::from_secs(2),
            ramp:            RampConfig::default(),
        }
    }
}

/// Link health as seen by the watchdog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Health {
    Ok,
    CmdStale,
}

/// The receiving side's single owner of all mutable state: transport handle,
/// validation pipeline, ramp controller, watchdog.
///
/// Everything happens on one task in [`poll`](Self::poll): drain pending
/// frames, run the watchdog, advance the ramps. The watchdog is independent
/// of the protocol: it fires even when the link is silent or delivering
/// garbage, and it unconditionally overrides any in-flight ramp target.
pub struct DriveRuntime<R, M>
where
    R: FrameReceiver,
{
    transport:     R,
    receiver:      CommandReceiver<R::Sender>,
    drive:         Drive<M>,
    config:        RuntimeConfig,
    last_accepted: Option<Instant>,
    health:        Health,
}

impl<R, M> DriveRuntime<R, M>
where
    R: FrameReceiver,
    M: MotorChannel,
{
    pub fn new(transport: R, key: [u8; KEY_SIZE], left: M, right: M, config: RuntimeConfig) -> Self {
        Self {
            transport,
            receiver: CommandReceiver::new(key),
            drive: Drive::new(left, right, config.ramp),
            config,
            last_accepted: None,
            // Stale until the first valid command arrives.
            health: Health::CmdStale,
        }
    }

    /// One scheduler pass. Non-blocking and bounded; never touches ramp
    /// state for a frame that did not fully validate.
    pub fn poll(&mut self, now: Instant) {
        for _ in 0..MAX_FRAMES_PER_POLL {
            let (sender, raw) = match self.transport.receive_if_available() {
                Ok(Some(incoming)) => incoming,
                Ok(None) => break,
                Err(e) => {
                    // Receive-side transport failures are drops, not faults;
                    // the watchdog covers a link that stays dead.
                    tracing::warn!(error = %e, "transport receive failure");
                    break;
                }
            };

            match self.receiver.on_frame(sender.clone(), &raw) {
                Ok(frame) => {
                    if self.health == Health::CmdStale {
                        tracing::info!(?sender, "command link live");
                    }
                    tracing::debug!(
                        ?sender,
                        command = ?frame.command,
                        left = frame.left_speed,
                        right = frame.right_speed,
                        sequence = frame.sequence,
                        "command accepted"
                    );

                    self.drive.apply_frame(&frame);
                    self.last_accepted = Some(now);
                    self.health = Health::Ok;
                }
                // Silent drop: no NACK exists on this link.
                Err(reason) => tracing::debug!(?sender, %reason, "frame dropped"),
            }
        }

        let stale = match self.last_accepted {
            Some(at) => now.duration_since(at) > self.config.command_timeout,
            None => true,
        };

        if stale {
            if self.health == Health::Ok {
                tracing::warn!(
                    timeout = ?self.config.command_timeout,
                    "no valid command within timeout, forcing stop"
                );
            }
            self.health = Health::CmdStale;
            self.drive.halt();
        }

        self.drive.tick(now);
    }

    /// Drive [`poll`](Self::poll) at the configured loop rate, forever.
    pub async fn run(&mut self) {
        let mut tick = tokio::time::interval(Duration::from_millis(1000 / self.config.loop_hz));

        tracing::info!(
            loop_hz = self.config.loop_hz,
            timeout = ?self.config.command_timeout,
            "drive runtime started"
        );

        loop {
            tick.tick().await;
            self.poll(Instant::now());
        }
    }

    pub fn health(&self) -> Health {
        self.health
    }

    pub fn targets(&self) -> (i16, i16) {
        self.drive.targets()
    }

    pub fn currents(&self) -> (i16, i16) {
        self.drive.currents()
    }
}
