use aggregator::AggregatorConfig;
use serde::Deserialize;
use std::fs::File;

#[derive(Debug, Deserialize)]
pub struct MetricsConfig {
    pub statsd_host: String,
    pub statsd_port: u16,
    #[serde(default = "default_metrics_prefix")]
    pub prefix: String,
}

fn default_metrics_prefix() -> String {
    "logfold".to_owned()
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub sentry_dsn: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    pub metrics: Option<MetricsConfig>,
    pub logging: Option<LoggingConfig>,
    #[serde(default)]
    pub aggregator: AggregatorConfig,
}

impl Config {
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: Config = serde_yaml::from_reader(file)?;
        config.aggregator.validate()?;

        Ok(config)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("invalid aggregator config: {0}")]
    InvalidAggregator(#[from] aggregator::config::ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tmp_file(s: &str) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        write!(tmp, "{}", s).expect("write yaml");

        tmp
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
            metrics:
                statsd_host: 127.0.0.1
                statsd_port: 8125
            logging:
                sentry_dsn: https://key@sentry.example.com/1
            aggregator:
                max_groups: 500
                stale_after_secs: 60
            "#;
        let tmp = write_tmp_file(yaml);
        let config = Config::from_file(tmp.path()).expect("load config");

        let metrics = config.metrics.expect("metrics config");
        assert_eq!(metrics.statsd_host, "127.0.0.1");
        assert_eq!(metrics.statsd_port, 8125);
        assert_eq!(metrics.prefix, "logfold");
        assert_eq!(
            config.logging.expect("logging config").sentry_dsn,
            "https://key@sentry.example.com/1"
        );
        assert_eq!(config.aggregator.max_groups, 500);
        assert_eq!(config.aggregator.stale_after_secs, 60);
        // Fields the file does not mention keep their defaults.
        assert_eq!(config.aggregator.key_field, "traceId");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let tmp = write_tmp_file("{}");
        let config = Config::from_file(tmp.path()).expect("load config");

        assert!(config.metrics.is_none());
        assert!(config.logging.is_none());
        assert_eq!(config.aggregator, AggregatorConfig::default());
    }

    #[test]
    fn test_invalid_aggregator_section_is_rejected() {
        let tmp = write_tmp_file("aggregator: {max_groups: 0}");
        assert!(matches!(
            Config::from_file(tmp.path()).unwrap_err(),
            ConfigError::InvalidAggregator(_)
        ));
    }

    #[test]
    fn test_missing_file() {
        let missing = std::path::Path::new("/nonexistent/logfold.yaml");
        assert!(matches!(
            Config::from_file(missing).unwrap_err(),
            ConfigError::LoadError(_)
        ));
    }
}
