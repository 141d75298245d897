//! # OpenCat Protocol Module
//!
//! Text command encoding understood by OpenCat firmware (Petoi Bittle).
//!
//! This module handles:
//! - Skill and gait token constants
//! - Encoding actions and movements into command tokens
//! - Framing tokens for the serial (Bluetooth) link

pub mod encoder;
pub mod protocol;
