// ── Core error types ──
//
// User-facing errors from moonward-core. Validation failures carry a
// machine-readable key plus the offending value so integrations can map
// them onto form fields; lookup failures are always locally recoverable;
// the discovery failure is distinguished from generic transport errors
// so callers can show a "pair a device" message instead of a stack trace.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Validation errors (raised before any network call) ───────────
    #[error("Validation failed for {key}: {value} ({reason})")]
    Validation {
        /// Machine-readable error key, e.g. `daily_playtime_range`.
        key: &'static str,
        /// The rejected input, rendered for diagnostics.
        value: String,
        reason: &'static str,
    },

    // ── Device state errors ──────────────────────────────────────────
    #[error("Device {device_id} cannot {operation}: {reason}")]
    InvalidDeviceState {
        device_id: String,
        operation: &'static str,
        reason: String,
    },

    // ── Lookup errors ────────────────────────────────────────────────
    #[error("Device not found: {device_id}")]
    DeviceNotFound { device_id: String },

    #[error("Application not found: {application_id}")]
    ApplicationNotFound { application_id: String },

    #[error("Player not found: {player_id}")]
    PlayerNotFound { player_id: String },

    #[error("No usage summary for {date} (or the day before)")]
    DateSummaryNotFound { date: chrono::NaiveDate },

    // ── Discovery errors ─────────────────────────────────────────────
    #[error("No devices found on this account")]
    NoDevicesFound,

    // ── API errors (wrapped, single translation point) ───────────────
    #[error(transparent)]
    Api(#[from] moonward_api::Error),
}

impl CoreError {
    pub(crate) fn validation(key: &'static str, value: impl ToString, reason: &'static str) -> Self {
        Self::Validation {
            key,
            value: value.to_string(),
            reason,
        }
    }

    /// Returns `true` for failures the caller can fix by correcting
    /// input (never worth retrying as-is).
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
