use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Tracing log configuration.
#[derive(Clone, clap::Args, Debug)]
pub struct Log {
    /// The level filter to use.
    #[arg(
        id = "log-level",
        long = "log-level",
        global = true,
        default_value = "info",
        env = "TLS_SIG_LOG_LEVEL"
    )]
    pub level: Level,
}

impl Log {
    pub fn level(&self) -> LevelFilter {
        LevelFilter::from_level(self.level)
    }

    /// Installs a stderr subscriber; `RUST_LOG` overrides `--log-level`.
    pub fn init(&self) {
        let filter = EnvFilter::builder()
            .with_default_directive(self.level().into())
            .from_env_lossy();

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(filter);

        tracing_subscriber::registry().with(fmt_layer).init();
    }
}
