pub mod client;
pub mod config;

pub use client::{GcsClient, public_url};
pub use config::{EMULATOR_HOST_ENV, GcsConfig};
