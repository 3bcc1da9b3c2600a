//! Reusable UI components

pub mod header;
pub mod spinner;
pub mod status_bar;
