//! Utilities shared by the hiroba packages.

pub mod logger;
pub mod time;
