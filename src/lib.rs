#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::module_name_repetitions)]
pub mod config;
pub mod fightsnake;
pub mod logging;
pub mod server;
pub mod strategies;
