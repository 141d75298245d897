//! # OpenCat Protocol Constants
//!
//! Command tokens sent to the robot. Skills are prefixed with
//! [`SKILL_PREFIX`]; movement skills are the gait token followed by a
//! heading suffix.

/// Prefix for every skill command
pub const SKILL_PREFIX: char = 'k';

/// Serial command terminator
pub const COMMAND_TERMINATOR: u8 = b'\n';

/// Maximum encoded token length accepted by the firmware's serial buffer
pub const MAX_COMMAND_LEN: usize = 32;

// Posture and behaviour skills
pub const SKILL_BALANCE: &str = "balance";
pub const SKILL_REST: &str = "rest";
pub const SKILL_GREETING: &str = "hi";
pub const SKILL_SIT: &str = "sit";
pub const SKILL_STEP: &str = "vt";

/// Gyro toggle, a bare command rather than a skill
pub const CMD_GYRO: &str = "g";

// Gait tokens
pub const GAIT_WALK: &str = "wk";
pub const GAIT_TROT: &str = "tr";
pub const GAIT_CRAWL: &str = "cr";
pub const GAIT_RUN: &str = "rn";

/// Backward movement skill; the firmware has a single backward gait
pub const GAIT_BACKWARD: &str = "bk";

// Heading suffixes
pub const HEADING_FORWARD: &str = "F";
pub const HEADING_LEFT: &str = "L";
pub const HEADING_RIGHT: &str = "R";

/// HTTP path on the robot's WiFi adapter that accepts commands
pub const WIFI_ACTION_PATH: &str = "/action";

/// Form field carrying the command token
pub const WIFI_COMMAND_FIELD: &str = "cmd";
