//! Logger setup built on `tracing-subscriber`.

use tracing_subscriber::{EnvFilter, fmt};

/// Build the default filter directive for a binary.
///
/// Binary names use hyphens while tracing targets use the crate name with
/// underscores, so `bgchooser-client` becomes `bgchooser_client=info`.
pub fn default_directive(bin_name: &str, default_level: &str) -> String {
    let target = bin_name.replace('-', "_");
    format!("{target}={default_level},bgchooser_shared={default_level}")
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `default_level` when it is set.
/// Logs are written to stderr so they never interleave with the game list on stdout.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(bin_name, default_level)));

    let result = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if let Err(e) = result {
        // A subscriber is already installed (e.g. in tests)
        tracing::debug!("Logger already initialized: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_uses_crate_target() {
        // テスト項目: バイナリ名のハイフンがアンダースコアに変換される
        // when (操作):
        let directive = default_directive("bgchooser-client", "debug");

        // then (期待する結果):
        assert_eq!(directive, "bgchooser_client=debug,bgchooser_shared=debug");
    }

    #[test]
    fn test_setup_logger_twice_does_not_panic() {
        // テスト項目: ロガーを二重に初期化してもパニックしない
        setup_logger("bgchooser-client", "info");
        setup_logger("bgchooser-client", "info");
    }
}
