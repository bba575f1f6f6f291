//=========================================================================
// Logging
//
// Installs `env_logger` behind the `log` facade.
//
// Targets used across the crate:
// - "platform", "platform::input": window host and input conversion
// - "overlay": overlay sets and layer control
// - "manipulators": manipulator stack and camera control
// - "frame": frame execution and lighting resolve
// - "vis": model visualisation cache and layers
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Once;

use log::{debug, LevelFilter};

//=== LoggingConfig =======================================================

/// Logger configuration.
///
/// `env_filter` uses the `env_logger` filter syntax, e.g.
/// `"info,manipulators=trace"`. When absent, `RUST_LOG` is read and the
/// level falls back to `Info`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.env_filter {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => match std::env::var("RUST_LOG") {
                Ok(filter) => {
                    builder.parse_filters(&filter);
                }
                Err(_) => {
                    builder.filter_level(LevelFilter::Info);
                }
            },
        }

        builder.write_style(config.write_style);

        // Another logger may already be installed (tests, embedding hosts).
        if builder.try_init().is_ok() {
            debug!(target: "platform", "Logging initialized");
        }
    });
}

//=========================================================================
// Unit Tests
//=========================================================================
