/*!
Installs `env_logger` behind the `log` macros used throughout the crate.

Probe results go to the log: `info` for progress, `warn` for soft failures such as a readback
mismatch or a skipped sub-image test, `error` for the failure that ends the program.

*/
use std::sync::Once;

/// Where the log filter comes from and how the output looks.
///
/// The default shows the probe's `info` progress unless `RUST_LOG` says otherwise. Set
/// `env_filter` to e.g. `"comptex::texture=debug"` to bypass the environment.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter directives, overriding `RUST_LOG`.
    pub env_filter: Option<String>,
    /// Whether to colorize the output.
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

static INIT: Once = Once::new();

/// Installs the logger for both programs and the GL tests.
///
/// Timestamps are off: a probe run is short and its lines are read in order. Only the first
/// call has an effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.write_style(config.write_style);
        builder.format_timestamp(None);

        // a test harness may have installed a logger already
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized");
    });
}
