// Endpoint catalog.
//
// Static mapping from logical operation to HTTP verb + path template.
// Path construction is centralized here so the dispatcher never
// hand-assembles URLs, and so an unknown operation is unrepresentable.

use reqwest::Method;

/// Production base URL of the Moon service.
pub const BASE_URL: &str = "https://api-lp1.pctl.srv.nintendo.net/moon/v1";

/// Client identity presented on every request. The service rejects
/// requests that do not look like the official mobile app.
pub mod identity {
    pub const USER_AGENT: &str = "moon_ANDROID/1.20.0 (com.nintendo.znma; build:300; ANDROID 34)";
    pub const APP_ID: &str = "com.nintendo.znma";
    pub const APP_VERSION: &str = "1.20.0";
    pub const APP_BUILD: &str = "300";
    pub const OS_NAME: &str = "ANDROID";
    pub const OS_VERSION: &str = "34";
    pub const DEVICE_MODEL: &str = "Pixel 7";
}

/// One logical operation against the Moon service.
///
/// Identifiers required by each operation are carried as variant fields,
/// so resolving a path can never fail at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint<'a> {
    /// Activated devices paired to the account.
    AccountDevices { account_id: &'a str },
    /// A single device record (alarm visibility, hardware generation).
    AccountDevice {
        account_id: &'a str,
        device_id: &'a str,
    },
    /// Recent per-day usage records for a device.
    DailySummaries { device_id: &'a str },
    /// Index of months with an available summary.
    MonthlySummaries { device_id: &'a str },
    /// One month's summary.
    MonthlySummary {
        device_id: &'a str,
        year: i32,
        month: u32,
    },
    /// The full parental-control settings document.
    ParentalControlSetting { device_id: &'a str },
    /// Replace the play-timer regulations section.
    UpdatePlayTimer { device_id: &'a str },
    /// Replace the unlock code (PIN).
    UpdateUnlockCode { device_id: &'a str },
    /// Replace restriction level / whitelist / custom settings.
    UpdateRestrictionLevel { device_id: &'a str },
    /// Grant extra playing time for today.
    UpdateExtraPlayingTime { device_id: &'a str },
    /// Read the alarm visibility state.
    AlarmSettingState { device_id: &'a str },
    /// Change the alarm visibility state.
    UpdateAlarmSettingState { device_id: &'a str },
}

impl Endpoint<'_> {
    /// The HTTP verb for this operation.
    pub fn method(&self) -> Method {
        match self {
            Self::AccountDevices { .. }
            | Self::AccountDevice { .. }
            | Self::DailySummaries { .. }
            | Self::MonthlySummaries { .. }
            | Self::MonthlySummary { .. }
            | Self::ParentalControlSetting { .. }
            | Self::AlarmSettingState { .. } => Method::GET,
            Self::UpdatePlayTimer { .. }
            | Self::UpdateUnlockCode { .. }
            | Self::UpdateRestrictionLevel { .. }
            | Self::UpdateExtraPlayingTime { .. }
            | Self::UpdateAlarmSettingState { .. } => Method::POST,
        }
    }

    /// The path (plus query, where the contract mandates one) relative to
    /// the service base URL.
    pub fn path(&self) -> String {
        match self {
            Self::AccountDevices { account_id } => {
                format!("/users/{account_id}/devices?filter.device.activated.$eq=true")
            }
            Self::AccountDevice {
                account_id,
                device_id,
            } => format!("/users/{account_id}/devices/{device_id}"),
            Self::DailySummaries { device_id } => {
                format!("/devices/{device_id}/daily_summaries")
            }
            Self::MonthlySummaries { device_id } => {
                format!("/devices/{device_id}/monthly_summaries")
            }
            Self::MonthlySummary {
                device_id,
                year,
                month,
            } => format!("/devices/{device_id}/monthly_summaries/{year}/{month:02}"),
            Self::ParentalControlSetting { device_id } => {
                format!("/devices/{device_id}/parental_control_setting")
            }
            Self::UpdatePlayTimer { device_id } => {
                format!("/devices/{device_id}/parental_control_setting/play_timer")
            }
            Self::UpdateUnlockCode { device_id } => {
                format!("/devices/{device_id}/parental_control_setting/unlock_code")
            }
            Self::UpdateRestrictionLevel { device_id } => format!(
                "/devices/{device_id}/parental_control_setting/functional_restriction_level"
            ),
            Self::UpdateExtraPlayingTime { device_id } => {
                format!("/devices/{device_id}/extra_playing_time")
            }
            Self::AlarmSettingState { device_id } | Self::UpdateAlarmSettingState { device_id } => {
                format!("/devices/{device_id}/alarm_setting_state")
            }
        }
    }

    /// Stable operation name, used in diagnostics and payload errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AccountDevices { .. } => "account_devices",
            Self::AccountDevice { .. } => "account_device",
            Self::DailySummaries { .. } => "daily_summaries",
            Self::MonthlySummaries { .. } => "monthly_summaries",
            Self::MonthlySummary { .. } => "monthly_summary",
            Self::ParentalControlSetting { .. } => "parental_control_setting",
            Self::UpdatePlayTimer { .. } => "update_play_timer",
            Self::UpdateUnlockCode { .. } => "update_unlock_code",
            Self::UpdateRestrictionLevel { .. } => "update_restriction_level",
            Self::UpdateExtraPlayingTime { .. } => "update_extra_playing_time",
            Self::AlarmSettingState { .. } => "alarm_setting_state",
            Self::UpdateAlarmSettingState { .. } => "update_alarm_setting_state",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monthly_summary_month_is_zero_padded() {
        let ep = Endpoint::MonthlySummary {
            device_id: "ABC",
            year: 2026,
            month: 3,
        };
        assert_eq!(ep.path(), "/devices/ABC/monthly_summaries/2026/03");
        assert_eq!(ep.method(), Method::GET);
    }

    #[test]
    fn device_list_filters_to_activated() {
        let ep = Endpoint::AccountDevices { account_id: "me" };
        assert!(ep.path().ends_with("devices?filter.device.activated.$eq=true"));
    }
}
