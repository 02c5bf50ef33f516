//! Platform abstraction layer
//!
//! Host-facing services the kernel itself never touches:
//! - Frame timing and fixed-step accumulation

pub mod time;

pub use time::{FixedStep, FrameClock};
