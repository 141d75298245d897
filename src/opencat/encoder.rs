//! # OpenCat Command Encoder
//!
//! Encodes actions and movements into OpenCat command tokens.
//!
//! | Input | Token |
//! |-------|-------|
//! | Balance / Stop | `kbalance` |
//! | Rest | `krest` |
//! | Greeting | `khi` |
//! | Sit | `ksit` |
//! | Step | `kvt` |
//! | Gyro | `g` |
//! | Forward, gait walk | `kwkF` |
//! | ForwardLeft, gait trot | `ktrL` |
//! | Backward (any gait) | `kbk` |
//! | BackwardRight (any gait) | `kbkR` |

use super::protocol::*;
use crate::controller::{ActionCommand, Direction, Gait};

/// Encode an action into its command token
///
/// # Examples
///
/// ```
/// use bittle_bridge::controller::ActionCommand;
/// use bittle_bridge::opencat::encoder::encode_action;
///
/// assert_eq!(encode_action(ActionCommand::Rest), "krest");
/// assert_eq!(encode_action(ActionCommand::Gyro), "g");
/// ```
#[must_use]
pub fn encode_action(action: ActionCommand) -> String {
    let skill = match action {
        ActionCommand::Balance => SKILL_BALANCE,
        ActionCommand::Rest => SKILL_REST,
        ActionCommand::Greeting => SKILL_GREETING,
        ActionCommand::Sit => SKILL_SIT,
        ActionCommand::Step => SKILL_STEP,
        ActionCommand::Gyro => return CMD_GYRO.to_string(),
    };
    format!("{}{}", SKILL_PREFIX, skill)
}

fn gait_token(gait: Gait) -> &'static str {
    match gait {
        Gait::Walk => GAIT_WALK,
        Gait::Trot => GAIT_TROT,
        Gait::Crawl => GAIT_CRAWL,
        Gait::Run => GAIT_RUN,
    }
}

/// Encode a direction into its command token
///
/// Forward headings use the selected gait. Backward headings always use the
/// backward skill. [`Direction::Stop`] is the balance posture.
///
/// # Examples
///
/// ```
/// use bittle_bridge::controller::{Direction, Gait};
/// use bittle_bridge::opencat::encoder::encode_direction;
///
/// assert_eq!(encode_direction(Direction::Forward, Gait::Run), "krnF");
/// assert_eq!(encode_direction(Direction::BackwardLeft, Gait::Run), "kbkL");
/// assert_eq!(encode_direction(Direction::Stop, Gait::Run), "kbalance");
/// ```
#[must_use]
pub fn encode_direction(direction: Direction, gait: Gait) -> String {
    let (skill, heading) = match direction {
        Direction::Forward => (gait_token(gait), HEADING_FORWARD),
        Direction::ForwardLeft => (gait_token(gait), HEADING_LEFT),
        Direction::ForwardRight => (gait_token(gait), HEADING_RIGHT),
        Direction::Backward => (GAIT_BACKWARD, ""),
        Direction::BackwardLeft => (GAIT_BACKWARD, HEADING_LEFT),
        Direction::BackwardRight => (GAIT_BACKWARD, HEADING_RIGHT),
        Direction::Stop => return encode_action(ActionCommand::Balance),
    };
    format!("{}{}{}", SKILL_PREFIX, skill, heading)
}

/// Frame a command token for the serial link
///
/// # Returns
///
/// * `Vec<u8>` - Token bytes followed by [`COMMAND_TERMINATOR`]
///
/// # Examples
///
/// ```
/// use bittle_bridge::opencat::encoder::frame_serial;
///
/// assert_eq!(frame_serial("ksit"), b"ksit\n".to_vec());
/// ```
#[must_use]
pub fn frame_serial(token: &str) -> Vec<u8> {
    let mut frame = Vec::with_capacity(token.len() + 1);
    frame.extend_from_slice(token.as_bytes());
    frame.push(COMMAND_TERMINATOR);
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAITS: [Gait; 4] = [Gait::Walk, Gait::Trot, Gait::Crawl, Gait::Run];

    #[test]
    fn test_encode_actions() {
        assert_eq!(encode_action(ActionCommand::Balance), "kbalance");
        assert_eq!(encode_action(ActionCommand::Rest), "krest");
        assert_eq!(encode_action(ActionCommand::Greeting), "khi");
        assert_eq!(encode_action(ActionCommand::Sit), "ksit");
        assert_eq!(encode_action(ActionCommand::Step), "kvt");
        assert_eq!(encode_action(ActionCommand::Gyro), "g");
    }

    #[test]
    fn test_forward_headings_follow_gait() {
        assert_eq!(encode_direction(Direction::Forward, Gait::Walk), "kwkF");
        assert_eq!(encode_direction(Direction::ForwardLeft, Gait::Trot), "ktrL");
        assert_eq!(encode_direction(Direction::ForwardRight, Gait::Crawl), "kcrR");
        assert_eq!(encode_direction(Direction::Forward, Gait::Run), "krnF");
    }

    #[test]
    fn test_backward_headings_ignore_gait() {
        for gait in GAITS {
            assert_eq!(encode_direction(Direction::Backward, gait), "kbk");
            assert_eq!(encode_direction(Direction::BackwardLeft, gait), "kbkL");
            assert_eq!(encode_direction(Direction::BackwardRight, gait), "kbkR");
        }
    }

    #[test]
    fn test_stop_is_balance() {
        for gait in GAITS {
            assert_eq!(
                encode_direction(Direction::Stop, gait),
                encode_action(ActionCommand::Balance)
            );
        }
    }

    #[test]
    fn test_tokens_fit_serial_buffer() {
        for gait in GAITS {
            for direction in [
                Direction::Forward,
                Direction::ForwardLeft,
                Direction::ForwardRight,
                Direction::Backward,
            ] {
                assert!(frame_serial(&encode_direction(direction, gait)).len() <= MAX_COMMAND_LEN);
            }
        }
    }

    #[test]
    fn test_frame_serial() {
        let frame = frame_serial("kbalance");
        assert_eq!(frame.last(), Some(&COMMAND_TERMINATOR));
        assert_eq!(&frame[..frame.len() - 1], b"kbalance");
    }
}
