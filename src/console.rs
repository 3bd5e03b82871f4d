use message::Command;

/// Speed used when the operator names a direction without magnitudes.
pub const DEFAULT_SPEED: u8 = 200;

/// Parse one operator line: `<command> [left [right]]`.
///
/// `right` defaults to `left`, and both default to [`DEFAULT_SPEED`].
/// Command words match the bridge JSON names (`forward`, `setspeed`, ...).
pub fn parse_command(line: &str) -> eyre::Result<(Command, u8, u8)> {
    let mut parts = line.split_whitespace();

    let word = parts.next().ok_or_else(|| eyre::eyre!("empty command"))?;
    let command = match word.to_ascii_lowercase().as_str() {
        "stop" => Command::Stop,
        "forward" => Command::Forward,
        "backward" => Command::Backward,
        "left" => Command::Left,
        "right" => Command::Right,
        "setspeed" => Command::SetSpeed,
        other => return Err(eyre::eyre!("unknown command {other:?}")),
    };

    let left = parts
        .next()
        .map(str::parse::<u8>)
        .transpose()
        .map_err(|e| eyre::eyre!("bad left speed: {e}"))?
        .unwrap_or(DEFAULT_SPEED);

    let right = parts
        .next()
        .map(str::parse::<u8>)
        .transpose()
        .map_err(|e| eyre::eyre!("bad right speed: {e}"))?
        .unwrap_or(left);

    if parts.next().is_some() {
        return Err(eyre::eyre!("too many arguments"));
    }

    Ok((command, left, right))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bare_direction_uses_defaults() {
        assert_eq!(
            parse_command("forward").unwrap(),
            (Command::Forward, DEFAULT_SPEED, DEFAULT_SPEED)
        );
    }

    #[test]
    fn right_defaults_to_left() {
        assert_eq!(parse_command("left 150").unwrap(), (Command::Left, 150, 150));
    }

    #[test]
    fn both_speeds() {
        assert_eq!(
            parse_command("setspeed 120 90").unwrap(),
            (Command::SetSpeed, 120, 90)
        );
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(
            parse_command("STOP").unwrap(),
            (Command::Stop, DEFAULT_SPEED, DEFAULT_SPEED)
        );
    }

    #[test]
    fn rejects_junk() {
        assert!(parse_command("").is_err());
        assert!(parse_command("fly 10").is_err());
        assert!(parse_command("forward 300").is_err());
        assert!(parse_command("forward 10 10 10").is_err());
    }
}
