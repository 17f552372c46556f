use serde::{Deserialize, Serialize};
use std::fs;
use std::sync::Once;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling, rolling::Rotation};
use tracing_subscriber::{
    fmt::{self, time::UtcTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

static INIT: Once = Once::new();

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub service_name: String,
    pub enable_console: bool,
    pub enable_file: bool,
    pub log_directory: String,
    pub enable_colors: bool,
    pub enable_thread_ids: bool,
    pub enable_file_line: bool,
    pub enable_module_path: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            service_name: "tenderly_faucet".to_string(),
            enable_console: true,
            enable_file: true,
            log_directory: "logs".to_string(),
            enable_colors: true,
            enable_thread_ids: false,
            enable_file_line: false,
            enable_module_path: true,
        }
    }
}

impl LogConfig {
    pub fn level(&self) -> Level {
        match self.level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    /// Filter directive used when `RUST_LOG` is not set
    pub fn default_directive(&self) -> String {
        let level = self.level();
        format!("{}={level},tenderly_faucet_core={level},actix_web=info", self.service_name)
    }
}

pub struct Logger;

impl Logger {
    /// Install the global subscriber with a console and a daily-rolling file layer.
    ///
    /// Only the first call has an effect. The returned guard flushes the file
    /// writer on drop and must be held for the lifetime of the process.
    pub fn init(config: &LogConfig) -> Option<WorkerGuard> {
        let mut guard = None;

        INIT.call_once(|| {
            let env_filter = EnvFilter::new(
                std::env::var("RUST_LOG").unwrap_or_else(|_| config.default_directive()),
            );

            let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

            if config.enable_console {
                let console_layer = fmt::layer()
                    .with_timer(UtcTime::rfc_3339())
                    .with_thread_ids(config.enable_thread_ids)
                    .with_file(config.enable_file_line)
                    .with_line_number(config.enable_file_line)
                    .with_target(config.enable_module_path)
                    .with_ansi(config.enable_colors)
                    .with_writer(std::io::stdout);
                layers.push(Box::new(console_layer));
            }

            if config.enable_file {
                if let Err(e) = fs::create_dir_all(&config.log_directory) {
                    eprintln!("Failed to create log directory: {e}");
                } else {
                    let file_appender = rolling::RollingFileAppender::new(
                        Rotation::DAILY,
                        &config.log_directory,
                        format!("{}.log", config.service_name),
                    );
                    let (non_blocking_file_appender, file_guard) = non_blocking(file_appender);
                    let file_layer = fmt::layer()
                        .with_timer(UtcTime::rfc_3339())
                        .with_thread_ids(config.enable_thread_ids)
                        .with_file(config.enable_file_line)
                        .with_line_number(config.enable_file_line)
                        .with_target(config.enable_module_path)
                        .with_ansi(false)
                        .with_writer(non_blocking_file_appender);
                    layers.push(Box::new(file_layer));
                    guard = Some(file_guard);
                }
            }

            let subscriber = Registry::default().with(layers).with(env_filter);
            if let Err(e) = subscriber.try_init() {
                eprintln!("Failed to install tracing subscriber: {e}");
            }
        });

        guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        let mut config = LogConfig::default();
        assert_eq!(config.level(), Level::INFO);

        config.level = "DEBUG".to_string();
        assert_eq!(config.level(), Level::DEBUG);

        config.level = "verbose".to_string();
        assert_eq!(config.level(), Level::INFO);
    }

    #[test]
    fn test_default_directive_covers_both_crates() {
        let config = LogConfig {
            level: "warn".to_string(),
            ..LogConfig::default()
        };
        let directive = config.default_directive();
        assert!(directive.contains("tenderly_faucet=WARN"));
        assert!(directive.contains("tenderly_faucet_core=WARN"));
    }
}
