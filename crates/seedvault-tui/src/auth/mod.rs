//! Unlock protection for the recovery phrase screen

mod lockout;
mod session;

pub use lockout::{LockoutPolicy, PinAttempts};
pub use session::IdleTimer;
