use runtime::MotorChannel;

/// Stand-in for the motor driver hardware: renders the direction-pin pair
/// and PWM duty an H-bridge channel would receive. Logs only on change so a
/// steady ramp does not flood the output.
pub struct LogChannel {
    side: &'static str,
    last: Option<i16>,
}

impl LogChannel {
    pub fn new(side: &'static str) -> Self {
        Self {
            side,
            last: None,
        }
    }
}

impl MotorChannel for LogChannel {
    fn drive(&mut self, speed: i16) {
        if self.last == Some(speed) {
            return;
        }
        self.last = Some(speed);

        let (in1, in2) = match speed {
            s if s > 0 => (true, false),
            s if s < 0 => (false, true),
            _ => (false, false),
        };

        tracing::info!(
            channel = self.side,
            in1,
            in2,
            duty = speed.unsigned_abs(),
            "motor output"
        );
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn dedups_repeated_values() {
        let mut channel = LogChannel::new("left");

        channel.drive(10);
        assert_eq!(channel.last, Some(10));

        channel.drive(10);
        channel.drive(-10);
        assert_eq!(channel.last, Some(-10));
    }
}
