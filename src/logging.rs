use std::env;

use log::{LevelFilter, SetLoggerError};

use crate::server::ACCESS_LOG;

/// Installs `pretty_env_logger` for local runs.
///
/// `RUST_LOG` takes over entirely when set. Otherwise everything logs at
/// `info`, except the per-request access log, which is kept quiet.
///
/// # Errors
///
/// Fails if a logger has already been installed.
pub fn init() -> Result<(), SetLoggerError> {
    let mut builder = pretty_env_logger::formatted_builder();

    match env::var("RUST_LOG") {
        Ok(filters) => {
            builder.parse_filters(&filters);
        }
        Err(_) => {
            builder
                .filter_level(LevelFilter::Info)
                .filter_module(ACCESS_LOG, LevelFilter::Error)
                .filter_module("hyper", LevelFilter::Warn);
        }
    }

    builder.try_init()
}
