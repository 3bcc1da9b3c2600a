//! Screen modules for different views

pub mod recovery_phrase;
pub mod unlock;
