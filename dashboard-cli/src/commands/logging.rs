use shared::config::{ClientConfig, LogFormat};
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt};

/// Installs the global subscriber. Events go to stderr so stdout carries only
/// rendered output.
pub fn init(config: &ClientConfig) {
    let builder = fmt()
        .with_env_filter(build_env_filter(config))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    let installed = if matches!(config.log_format, LogFormat::Json) {
        builder.json().with_ansi(false).try_init()
    } else {
        builder.with_ansi(false).try_init()
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

fn build_env_filter(config: &ClientConfig) -> EnvFilter {
    let default_level = config
        .log_level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::WARN);

    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::builder()
            .with_default_directive(default_level.into())
            .parse_lossy("")
    })
}
