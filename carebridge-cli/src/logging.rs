use shared::config::{ClientConfig, LogFormat};
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt};

/// Installs the global subscriber. Log lines go to stderr so command output
/// on stdout stays clean. `RUST_LOG` wins over the configured level.
pub fn initialize_tracing(config: &ClientConfig) {
    let fmt_builder = fmt::fmt()
        .with_env_filter(build_env_filter(config))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    if matches!(config.log_format, LogFormat::Json) {
        fmt_builder.json().with_ansi(false).init();
    } else {
        fmt_builder.init();
    }
}

fn default_level(config: &ClientConfig) -> LevelFilter {
    config
        .log_level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::INFO)
}

fn build_env_filter(config: &ClientConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::builder()
            .with_default_directive(default_level(config).into())
            .from_env_lossy()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_is_used() {
        let config = ClientConfig {
            log_level: "debug".to_string(),
            ..ClientConfig::with_defaults()
        };
        assert_eq!(default_level(&config), LevelFilter::DEBUG);
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        let config = ClientConfig {
            log_level: "chatty".to_string(),
            ..ClientConfig::with_defaults()
        };
        assert_eq!(default_level(&config), LevelFilter::INFO);
    }
}
