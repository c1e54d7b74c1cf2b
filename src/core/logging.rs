//! Logging setup for perp_gateway
//!
//! `tracing` events go through a single `tracing-subscriber` registry,
//! filtered by `RUST_LOG` and rendered as JSON lines unless `LOG_FORMAT=pretty`.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RUST_LOG` | `perp_gateway=info,tower_http=info` | Level filter |
//! | `LOG_FORMAT` | `json` | `json` or `pretty` |
//!
//! Starknet keys, JWTs and signatures are never logged raw:
//!
//! ```rust,ignore
//! tracing::info!(jwt = %SanitizedValue::new(&token), "JWT obtained");
//! // jwt = "eyJh...REDACTED"
//! ```

use std::env;
use std::fmt;
use std::sync::Once;

use tracing_subscriber::{fmt as ts_fmt, fmt::format::FmtSpan, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Filter used when `RUST_LOG` is unset or unparsable
pub const DEFAULT_LOG_LEVEL: &str = "perp_gateway=info,tower_http=info";

/// Characters of a secret kept visible by `SanitizedValue`
const SECRET_VISIBLE_CHARS: usize = 4;

/// Characters of a signature kept visible by `sanitize_signature`
const SIGNATURE_VISIBLE_CHARS: usize = 8;

/// Redacting wrapper for JWTs and keys in log fields.
///
/// Values longer than 8 characters keep their first 4; shorter ones are
/// fully redacted.
#[derive(Clone)]
pub struct SanitizedValue<'a>(&'a str);

impl<'a> SanitizedValue<'a> {
    pub fn new(value: &'a str) -> Self {
        Self(value)
    }
}

fn visible_prefix(value: &str, keep: usize) -> String {
    value.chars().take(keep).collect()
}

impl fmt::Display for SanitizedValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.chars().count() <= 2 * SECRET_VISIBLE_CHARS {
            return f.write_str("REDACTED");
        }
        write!(f, "{}...REDACTED", visible_prefix(self.0, SECRET_VISIBLE_CHARS))
    }
}

impl fmt::Debug for SanitizedValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SanitizedValue(***)")
    }
}

/// Shorten a Starknet or EVM signature to its first 8 characters
pub fn sanitize_signature(sig: &str) -> String {
    if sig.chars().count() <= SIGNATURE_VISIBLE_CHARS + 4 {
        return "REDACTED".to_string();
    }
    format!("{}...", visible_prefix(sig, SIGNATURE_VISIBLE_CHARS))
}

/// Output rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl LogFormat {
    /// `pretty` (any case) selects pretty output; anything else is JSON
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("pretty") {
            LogFormat::Pretty
        } else {
            LogFormat::Json
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `EnvFilter` directive string, e.g. "perp_gateway=debug"
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::Json,
        }
    }
}

impl LoggingConfig {
    /// Read `RUST_LOG` and `LOG_FORMAT`
    pub fn from_env() -> Self {
        Self {
            filter: env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
            format: env::var("LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or_default(),
        }
    }
}

/// Install the global subscriber from the environment
pub fn init_logging() {
    init_logging_with_config(LoggingConfig::from_env());
}

/// Install the global subscriber; only the first call has an effect.
pub fn init_logging_with_config(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
        let registry = tracing_subscriber::registry().with(filter);

        match config.format {
            LogFormat::Pretty => registry
                .with(ts_fmt::layer().pretty().with_file(false).with_line_number(false))
                .init(),
            LogFormat::Json => registry
                .with(
                    ts_fmt::layer()
                        .json()
                        .with_current_span(true)
                        .with_span_events(FmtSpan::CLOSE),
                )
                .init(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_jwt_is_redacted() {
        let jwt = "eyJhbGciOiJIUzI1NiJ9.payload";
        assert_eq!(SanitizedValue::new(jwt).to_string(), "eyJh...REDACTED");
        assert_eq!(format!("{:?}", SanitizedValue::new(jwt)), "SanitizedValue(***)");
    }

    #[test]
    fn test_short_secrets_fully_redacted() {
        assert_eq!(SanitizedValue::new("").to_string(), "REDACTED");
        assert_eq!(SanitizedValue::new("0x5ec2e7").to_string(), "REDACTED");
    }

    #[test]
    fn test_redaction_respects_char_boundaries() {
        assert_eq!(SanitizedValue::new("ééééééééé").to_string(), "éééé...REDACTED");
    }

    #[test]
    fn test_starknet_signature_shortened() {
        let sig = r#"["1234567890123","987654321"]"#;
        assert_eq!(sanitize_signature(sig), r#"["123456..."#);
        assert_eq!(sanitize_signature("0x1b"), "REDACTED");
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("PRETTY"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse(" pretty "), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("compact"), LogFormat::Json);
    }

    #[test]
    #[serial]
    fn test_logging_config_from_env() {
        std::env::remove_var("RUST_LOG");
        std::env::remove_var("LOG_FORMAT");
        let config = LoggingConfig::from_env();
        assert_eq!(config.filter, DEFAULT_LOG_LEVEL);
        assert_eq!(config.format, LogFormat::Json);

        std::env::set_var("RUST_LOG", "perp_gateway=debug");
        std::env::set_var("LOG_FORMAT", "pretty");
        let config = LoggingConfig::from_env();
        assert_eq!(config.filter, "perp_gateway=debug");
        assert_eq!(config.format, LogFormat::Pretty);
        std::env::remove_var("RUST_LOG");
        std::env::remove_var("LOG_FORMAT");
    }
}
