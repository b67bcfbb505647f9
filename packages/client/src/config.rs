//! Client configuration.
//!
//! Command-line arguments (with environment fallbacks) are parsed by `clap`
//! and validated into a [`ClientConfig`].

use std::time::Duration;

use clap::Parser;

use crate::domain::{RoomId, UserId, ValueObjectError};

/// Default backend address
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

/// Default number of attempts while the catalog service is still processing
pub const DEFAULT_IMPORT_MAX_ATTEMPTS: u32 = 10;

/// Default delay between two attempts (milliseconds)
pub const DEFAULT_IMPORT_RETRY_DELAY_MS: u64 = 2000;

/// Terminal client for BG Chooser
#[derive(Debug, Clone, Parser)]
#[command(name = "bgchooser-client", version, about)]
pub struct Args {
    /// Backend base URL
    #[arg(long, env = "BGCHOOSER_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    pub server_url: String,

    /// Name you vote under
    #[arg(short, long, env = "BGCHOOSER_USER")]
    pub user: String,

    /// Room to join; a new room is created when omitted
    #[arg(short, long, env = "BGCHOOSER_ROOM")]
    pub room: Option<String>,

    /// How many times to ask for a catalog collection that is still being processed
    #[arg(long, env = "BGCHOOSER_IMPORT_MAX_ATTEMPTS", default_value_t = DEFAULT_IMPORT_MAX_ATTEMPTS)]
    pub import_max_attempts: u32,

    /// Delay between two collection requests, in milliseconds
    #[arg(long, env = "BGCHOOSER_IMPORT_RETRY_DELAY_MS", default_value_t = DEFAULT_IMPORT_RETRY_DELAY_MS)]
    pub import_retry_delay_ms: u64,

    /// Double the delay after every attempt instead of keeping it fixed
    #[arg(long, env = "BGCHOOSER_IMPORT_BACKOFF")]
    pub import_backoff: bool,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, env = "BGCHOOSER_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

/// How the delay between attempts evolves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    Fixed,
    Exponential,
}

/// Bounded retry policy for the rate-limited catalog service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            backoff: Backoff::Fixed,
        }
    }

    /// Delay to wait after the given (1-based) attempt
    pub fn delay_after(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.delay,
            Backoff::Exponential => {
                let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
                self.delay.saturating_mul(factor)
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(
            DEFAULT_IMPORT_MAX_ATTEMPTS,
            Duration::from_millis(DEFAULT_IMPORT_RETRY_DELAY_MS),
        )
    }
}

/// Validated client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_url: String,
    pub user: UserId,
    pub room: Option<RoomId>,
    pub retry: RetryPolicy,
    pub log_level: String,
}

impl ClientConfig {
    /// Base URL without a trailing slash
    pub fn http_base(&self) -> &str {
        self.server_url.trim_end_matches('/')
    }

    /// WebSocket base URL derived from the HTTP one
    pub fn ws_base(&self) -> String {
        let base = self.http_base();
        if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            base.to_string()
        }
    }
}

impl TryFrom<Args> for ClientConfig {
    type Error = ValueObjectError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let user = UserId::new(args.user)?;
        let room = args.room.map(RoomId::new).transpose()?;
        let backoff = if args.import_backoff {
            Backoff::Exponential
        } else {
            Backoff::Fixed
        };
        Ok(Self {
            server_url: args.server_url,
            user,
            room,
            retry: RetryPolicy {
                max_attempts: args.import_max_attempts,
                delay: Duration::from_millis(args.import_retry_delay_ms),
                backoff,
            },
            log_level: args.log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        // テスト項目: 必須引数のみでデフォルト値が設定される
        // when (操作):
        let args = Args::try_parse_from(["bgchooser-client", "--user", "alice"]).unwrap();
        let config = ClientConfig::try_from(args).unwrap();

        // then (期待する結果):
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.user.as_str(), "alice");
        assert!(config.room.is_none());
        assert_eq!(config.retry, RetryPolicy::default());
    }

    #[test]
    fn test_args_empty_user_fails() {
        // テスト項目: 空のユーザー名は設定エラーになる
        let args = Args::try_parse_from(["bgchooser-client", "--user", ""]).unwrap();
        let result = ClientConfig::try_from(args);
        assert_eq!(result.unwrap_err(), ValueObjectError::UserIdEmpty);
    }

    #[test]
    fn test_ws_base_from_http() {
        // テスト項目: HTTP の URL から WebSocket の URL が導出される
        let args = Args::try_parse_from([
            "bgchooser-client",
            "--user",
            "alice",
            "--server-url",
            "https://bg.example.com/",
        ])
        .unwrap();
        let config = ClientConfig::try_from(args).unwrap();
        assert_eq!(config.http_base(), "https://bg.example.com");
        assert_eq!(config.ws_base(), "wss://bg.example.com");
    }

    #[test]
    fn test_exponential_backoff_delays() {
        // テスト項目: 指数バックオフでは待ち時間が倍々になる
        let policy = RetryPolicy {
            max_attempts: 5,
            delay: Duration::from_millis(100),
            backoff: Backoff::Exponential,
        };
        assert_eq!(policy.delay_after(1), Duration::from_millis(100));
        assert_eq!(policy.delay_after(3), Duration::from_millis(400));
        assert_eq!(
            RetryPolicy::fixed(5, Duration::from_millis(100)).delay_after(3),
            Duration::from_millis(100)
        );
    }
}
