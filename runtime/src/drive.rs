use std::time::{
    Duration,
    Instant,
};

use message::{
    Command,
    ControlFrame,
};

/// Largest magnitude a channel can be driven at, matching the 8-bit PWM
/// range of the wire speeds.
pub const SPEED_LIMIT: i16 = 255;

/// One physical motor channel: sign selects the direction-pin pair, the
/// magnitude becomes PWM duty. Implemented once, instantiated per side.
pub trait MotorChannel {
    /// `speed` is in `[-SPEED_LIMIT, SPEED_LIMIT]`.
    fn drive(&mut self, speed: i16);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RampConfig {
    /// Largest change in output per ramp tick.
    pub step:     i16,
    /// Minimum time between ramp ticks.
    pub interval: Duration,
}

impl Default for RampConfig {
    fn default() -> Self {
        Self {
            step:     10,
            interval: Duration::from_millis(10),
        }
    }
}

/// Rate-limited approach of an output value toward a target.
#[derive(Debug, Default, Clone, Copy)]
struct Ramp {
    target:  i16,
    current: i16,
}

impl Ramp {
    /// Move `current` one bounded step toward `target`, clamped so it never
    /// overshoots.
    fn step_toward(&mut self, step: i16) {
        if self.current < self.target {
            self.current = (self.current + step).min(self.target);
        } else if self.current > self.target {
            self.current = (self.current - step).max(self.target);
        }
    }
}

struct Channel<M> {
    motor: M,
    ramp:  Ramp,
}

impl<M> Channel<M>
where
    M: MotorChannel,
{
    fn tick(&mut self, step: i16) {
        self.ramp.step_toward(step);
        self.motor.drive(self.ramp.current);
    }
}

/// The two-channel ramp controller.
///
/// Targets change instantly on every accepted command; outputs chase them at
/// a bounded rate, independently per channel. Direction commands set the
/// sign pattern, `SetSpeed` changes magnitudes while each channel keeps the
/// direction it already has (a stopped channel counts as forward).
pub struct Drive<M> {
    left:      Channel<M>,
    right:     Channel<M>,
    config:    RampConfig,
    last_ramp: Option<Instant>,
}

impl<M> Drive<M>
where
    M: MotorChannel,
{
    pub fn new(left: M, right: M, config: RampConfig) -> Self {
        Self {
            left: Channel {
                motor: left,
                ramp:  Ramp::default(),
            },
            right: Channel {
                motor: right,
                ramp:  Ramp::default(),
            },
            config,
            last_ramp: None,
        }
    }

    /// Set both ramp targets from an accepted command.
    pub fn apply(&mut self, command: Command, left_speed: u8, right_speed: u8) {
        let (l, r) = (i16::from(left_speed), i16::from(right_speed));

        let (left, right) = match command {
            Command::Stop => (0, 0),
            Command::Forward => (l, r),
            Command::Backward => (-l, -r),
            Command::Left => (-l, r),
            Command::Right => (l, -r),
            Command::SetSpeed => (
                if self.left.ramp.target < 0 { -l } else { l },
                if self.right.ramp.target < 0 { -r } else { r },
            ),
        };

        tracing::debug!(?command, left, right, "ramp targets set");
        self.left.ramp.target = left;
        self.right.ramp.target = right;
    }

    pub fn apply_frame(&mut self, frame: &ControlFrame) {
        self.apply(frame.command, frame.left_speed, frame.right_speed);
    }

    /// Force both targets to zero. Outputs still ramp down rather than
    /// cutting instantly.
    pub fn halt(&mut self) {
        self.left.ramp.target = 0;
        self.right.ramp.target = 0;
    }

    /// Advance the ramps if the configured interval has elapsed and push the
    /// new outputs to the motors. Cheap and non-blocking; safe to call every
    /// scheduler pass.
    pub fn tick(&mut self, now: Instant) {
        if let Some(last) = self.last_ramp {
            if now.duration_since(last) < self.config.interval {
                return;
            }
        }
        self.last_ramp = Some(now);

        self.left.tick(self.config.step);
        self.right.tick(self.config.step);
    }

    pub fn targets(&self) -> (i16, i16) {
        (self.left.ramp.target, self.right.ramp.target)
    }

    pub fn currents(&self) -> (i16, i16) {
        (self.left.ramp.current, self.right.ramp.current)
    }
}
