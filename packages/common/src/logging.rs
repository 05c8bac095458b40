//! Logging initialisation and redaction helpers
//!
//! Library code logs through `tracing`; with its `log` feature enabled and no
//! subscriber installed, events are forwarded to the `log` facade, which
//! `env_logger` prints. Payload bytes and key material are never logged.

use log::info;
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Hex characters of a tag shown in logs
const FINGERPRINT_HEX_LEN: usize = 8;

/// Logging setup for binaries and tests embedding the pipeline
pub struct LoggingTransformer;

impl LoggingTransformer {
    /// Initialize logging system (should be called once at application startup)
    ///
    /// Configure logging levels via `RUST_LOG`:
    /// - `RUST_LOG=debug` - per-stage progress
    /// - `RUST_LOG=warn` - rejected admissions and stage failures only
    /// - `RUST_LOG=tanktrust=debug,tanktrust_hashing=warn` - per-crate levels
    pub fn init() {
        INIT_LOGGER.call_once(|| {
            env_logger::Builder::from_default_env()
                .format_timestamp_micros()
                .init();

            info!("Structured logging initialized");
        });
    }

    /// Initialize logging for test environments
    ///
    /// Safe to call from every test; later calls are no-ops.
    pub fn init_test() {
        let _ = env_logger::Builder::from_default_env()
            .is_test(true)
            .try_init();
    }

    /// Short hex prefix of an authentication tag, safe to log
    #[must_use]
    pub fn tag_fingerprint(tag: &[u8]) -> String {
        let encoded = hex::encode(tag);
        let end = encoded.len().min(FINGERPRINT_HEX_LEN);
        format!("#{}", &encoded[..end])
    }

    /// Log a failed stage without exposing buffer contents
    pub fn log_stage_failure(
        channel: usize,
        stage: crate::StageKind,
        direction: crate::Direction,
        error: &crate::StageError,
    ) {
        tracing::error!(
            channel,
            %stage,
            %direction,
            "Could not perform {stage}: {error}"
        );
    }
}
