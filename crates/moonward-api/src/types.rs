//! Wire types for the Moon parental-controls API.
//!
//! All types match the JSON documents exchanged with the service. Field
//! names use camelCase via `#[serde(rename_all = "camelCase")]`. The
//! service owns these schemas and extends them without notice, so every
//! document carries a `#[serde(flatten)]` catch-all: unknown fields are
//! preserved and round-tripped verbatim, which matters for the settings
//! document (mutations resend the whole section they touch).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Account devices ──────────────────────────────────────────────────

/// Device list -- from `GET /users/{account}/devices`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedDevicesResponse {
    pub owned_devices: Vec<OwnedDevice>,
}

/// One paired device record. Also returned on its own by
/// `GET /users/{account}/devices/{device}` (the "extras" group: alarm
/// visibility, hardware generation, camera/model metadata).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedDevice {
    pub device_id: String,
    pub label: String,
    #[serde(default)]
    pub parental_control_setting_state: Option<SettingState>,
    #[serde(default)]
    pub alarm_setting: Option<AlarmSetting>,
    /// Hardware generation marker; string or integer depending on model.
    #[serde(default)]
    pub platform_generation: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Settings synchronization state for a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingState {
    /// ISO 8601 timestamp of the last settings sync.
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Alarm visibility block on a device record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmSetting {
    /// One of: `VISIBLE`, `INVISIBLE`.
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Daily summaries ──────────────────────────────────────────────────

/// Recent usage records -- from `GET /devices/{device}/daily_summaries`.
/// Ordered most-recent-first; a bounded window, not an append-only log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummariesResponse {
    pub daily_summaries: Vec<DailySummary>,
}

/// One day's usage on one device. Times are whole minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: NaiveDate,
    #[serde(default)]
    pub playing_time: u32,
    #[serde(default)]
    pub disabled_time: u32,
    #[serde(default)]
    pub exceeded_time: u32,
    #[serde(default)]
    pub players: Vec<DailyPlayerSummary>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-profile breakdown inside a daily summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPlayerSummary {
    pub profile: PlayerProfile,
    #[serde(default)]
    pub playing_time: u32,
    #[serde(default)]
    pub played_apps: Vec<PlayedApp>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A profile reference as embedded in summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub player_id: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub image_uri: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One application's playtime record inside a summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayedApp {
    pub application_id: String,
    #[serde(default)]
    pub playing_time: u32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub first_play_date: Option<NaiveDate>,
    #[serde(default)]
    pub has_ugc: Option<bool>,
    #[serde(default)]
    pub image_uri: Option<ImageUriSet>,
    #[serde(default)]
    pub shop_uri: Option<String>,
    #[serde(default)]
    pub playing_days: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Artwork in multiple resolutions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUriSet {
    #[serde(default)]
    pub small: Option<String>,
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Monthly summaries ────────────────────────────────────────────────

/// Index of available months -- from
/// `GET /devices/{device}/monthly_summaries`. Empty for new devices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummariesResponse {
    #[serde(default)]
    pub available: Vec<MonthlySummaryIndex>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummaryIndex {
    pub year: i32,
    pub month: u32,
}

/// One month's summary -- insights plus per-profile totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
    /// Vendor insights block -- opaque, surfaced as-is.
    #[serde(default)]
    pub insights: Option<Value>,
    #[serde(default)]
    pub played_apps: Vec<PlayedApp>,
    #[serde(default)]
    pub players: Vec<MonthlyPlayer>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Profile + summary pair inside a monthly summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPlayer {
    pub profile: PlayerProfile,
    #[serde(default)]
    pub summary: MonthlyPlayerSummary,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPlayerSummary {
    #[serde(default)]
    pub playing_time: u32,
    #[serde(default)]
    pub played_apps: Vec<PlayedApp>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Settings document ────────────────────────────────────────────────

/// The full parental-control settings document for one device.
///
/// The service has no patch semantics: every mutation reads this
/// document, adjusts one substructure, and resends the affected section
/// whole. The response to a write embeds the updated document, and that
/// echo -- never the client-side guess -- becomes the local copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentalControlSetting {
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub etag: Option<String>,
    /// The PIN protecting on-console settings.
    #[serde(default)]
    pub unlock_code: Option<String>,
    /// One of: `NONE`, `CHILDREN`, `YOUNG_TEENS`, `OLDER_TEENS`, `CUSTOM`.
    #[serde(default)]
    pub functional_restriction_level: Option<String>,
    #[serde(default)]
    pub play_timer_regulations: PlayTimerRegulations,
    /// Append-only on the service side: entries are added when an app is
    /// whitelisted and may later be dropped, but ids are never reused.
    #[serde(default)]
    pub whitelisted_application_list: Option<Vec<WhitelistedApplication>>,
    #[serde(default)]
    pub custom_settings: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Play-timer section of the settings document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayTimerRegulations {
    /// One of: `DAILY`, `EACH_DAY_OF_THE_WEEK`.
    #[serde(default)]
    pub timer_mode: Option<String>,
    /// One of: `FORCED_TERMINATION`, `ALARM`.
    #[serde(default)]
    pub restriction_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_regulations: Option<DailyRegulation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub each_day_of_the_week_regulations: Option<EachDayOfTheWeekRegulations>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Limit + bedtime pair, used both as the uniform daily regulation and
/// as each weekday's entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRegulation {
    #[serde(default)]
    pub time_to_play_in_one_day: PlayTimeLimit,
    #[serde(default)]
    pub bedtime: BedtimeRegulation,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayTimeLimit {
    #[serde(default)]
    pub enabled: bool,
    /// Daily cap in whole minutes; `null` means unlimited.
    #[serde(default)]
    pub limit_time: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Bedtime window. `starting_time` is the morning release (bedtime
/// ends), `ending_time` the evening alarm (play ends). When disabled,
/// both MUST serialize as `null` -- the service rejects zero-values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BedtimeRegulation {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub starting_time: Option<WireTime>,
    #[serde(default)]
    pub ending_time: Option<WireTime>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Minute-resolution time of day. No seconds on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireTime {
    pub hour: u8,
    pub minute: u8,
}

/// One whitelist entry in the settings document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhitelistedApplication {
    pub application_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image_uri: Option<ImageUriSet>,
    #[serde(default)]
    pub first_play_date: Option<NaiveDate>,
    #[serde(default)]
    pub has_ugc: Option<bool>,
    #[serde(default)]
    pub shop_uri: Option<String>,
    #[serde(default)]
    pub playing_days: Option<u32>,
    /// One of: `NONE`, `ALLOW`.
    #[serde(default)]
    pub safe_launch: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Weekday regulations ──────────────────────────────────────────────

/// Per-weekday regulations, keyed by canonical lowercase day names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EachDayOfTheWeekRegulations {
    #[serde(default)]
    pub monday: Option<DailyRegulation>,
    #[serde(default)]
    pub tuesday: Option<DailyRegulation>,
    #[serde(default)]
    pub wednesday: Option<DailyRegulation>,
    #[serde(default)]
    pub thursday: Option<DailyRegulation>,
    #[serde(default)]
    pub friday: Option<DailyRegulation>,
    #[serde(default)]
    pub saturday: Option<DailyRegulation>,
    #[serde(default)]
    pub sunday: Option<DailyRegulation>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EachDayOfTheWeekRegulations {
    /// Look up a day by its canonical lowercase name.
    pub fn day(&self, day: &str) -> Option<&DailyRegulation> {
        match day {
            "monday" => self.monday.as_ref(),
            "tuesday" => self.tuesday.as_ref(),
            "wednesday" => self.wednesday.as_ref(),
            "thursday" => self.thursday.as_ref(),
            "friday" => self.friday.as_ref(),
            "saturday" => self.saturday.as_ref(),
            "sunday" => self.sunday.as_ref(),
            _ => None,
        }
    }

    /// Mutable slot for a day, created on first use.
    pub fn day_mut(&mut self, day: &str) -> Option<&mut DailyRegulation> {
        let slot = match day {
            "monday" => &mut self.monday,
            "tuesday" => &mut self.tuesday,
            "wednesday" => &mut self.wednesday,
            "thursday" => &mut self.thursday,
            "friday" => &mut self.friday,
            "saturday" => &mut self.saturday,
            "sunday" => &mut self.sunday,
            _ => return None,
        };
        Some(slot.get_or_insert_with(DailyRegulation::default))
    }
}

// ── Mutation bodies ──────────────────────────────────────────────────

/// Body of the restriction-level update. Members the caller does not
/// intend to change are sent as explicit `null`s per the endpoint
/// contract, so every field serializes even when `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestrictionUpdate {
    pub device_id: String,
    pub custom_settings: Value,
    pub vr_restriction_etag: Option<String>,
    pub whitelisted_application_list: Option<Vec<WhitelistedApplication>>,
    pub functional_restriction_level: Option<String>,
    pub parental_control_setting_etag: Option<String>,
}

// ── Alarm setting state ──────────────────────────────────────────────

/// Alarm state acknowledgment / read -- both directions of
/// `/devices/{device}/alarm_setting_state`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmStateResponse {
    /// One of: `SUCCESS`, `TO_VISIBLE`, `TO_INVISIBLE`, `VISIBLE`,
    /// `INVISIBLE`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn settings_round_trip_preserves_unknown_fields() {
        let doc = json!({
            "deviceId": "D1",
            "etag": "abc",
            "playTimerRegulations": {
                "timerMode": "DAILY",
                "dailyRegulations": {
                    "timeToPlayInOneDay": { "enabled": true, "limitTime": 120 },
                    "bedtime": { "enabled": false, "startingTime": null, "endingTime": null }
                },
                "vendorOnlyKnob": 7
            },
            "futureField": { "nested": [1, 2, 3] }
        });

        let parsed: ParentalControlSetting = serde_json::from_value(doc.clone()).unwrap();
        assert_eq!(parsed.extra.get("futureField"), doc.get("futureField"));
        assert_eq!(
            parsed.play_timer_regulations.extra.get("vendorOnlyKnob"),
            Some(&json!(7))
        );

        let back = serde_json::to_value(&parsed).unwrap();
        assert_eq!(back.get("futureField"), doc.get("futureField"));
        assert_eq!(
            back.pointer("/playTimerRegulations/vendorOnlyKnob"),
            Some(&json!(7))
        );
    }

    #[test]
    fn disabled_bedtime_serializes_null_times() {
        let bedtime = BedtimeRegulation::default();
        let value = serde_json::to_value(&bedtime).unwrap();
        assert_eq!(value.get("startingTime"), Some(&Value::Null));
        assert_eq!(value.get("endingTime"), Some(&Value::Null));
    }

    #[test]
    fn restriction_update_keeps_untouched_members_as_null() {
        let update = RestrictionUpdate {
            device_id: "D1".into(),
            custom_settings: json!({}),
            vr_restriction_etag: None,
            whitelisted_application_list: None,
            functional_restriction_level: None,
            parental_control_setting_etag: None,
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value.get("whitelistedApplicationList"), Some(&Value::Null));
        assert_eq!(value.get("functionalRestrictionLevel"), Some(&Value::Null));
        assert_eq!(value.get("parentalControlSettingEtag"), Some(&Value::Null));
    }

    #[test]
    fn weekday_lookup_rejects_unknown_names() {
        let mut regs = EachDayOfTheWeekRegulations::default();
        assert!(regs.day_mut("Funday").is_none());
        assert!(regs.day_mut("friday").is_some());
        assert!(regs.day("friday").is_some());
    }
}
