use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*, reload};

/// Handle on the installed log filter
pub struct LogHandle {
    filter: Option<reload::Handle<EnvFilter, Registry>>,
    from_env: bool,
}

impl LogHandle {
    /// Switch to debug logging unless `RUST_LOG` already decides the level
    pub fn raise_to_debug(&self) {
        if self.from_env {
            return;
        }
        if let Some(handle) = &self.filter {
            if let Err(e) = handle.modify(|filter| *filter = EnvFilter::new("debug")) {
                tracing::warn!("Could not raise log level: {e}");
            }
        }
    }
}

/// Install the subscriber. Logs go to stderr so script output stays on stdout.
pub fn init(verbose: bool) -> LogHandle {
    let from_env = std::env::var_os(EnvFilter::DEFAULT_ENV).is_some();
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let (filter, handle) = reload::Layer::new(env_filter);
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .is_ok();

    LogHandle {
        filter: installed.then_some(handle),
        from_env: from_env && !verbose,
    }
}
