// ── Domain enums ──
//
// The api crate carries these as raw strings (the service owns the
// vocabulary); this module is the typed vocabulary consumers see.
// Display renders the wire spelling, FromStr parses it back.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Whether daily limits apply uniformly or per weekday.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimerMode {
    #[default]
    Daily,
    EachDayOfTheWeek,
}

/// What happens when the play timer runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RestrictionMode {
    /// Software is suspended when time runs out.
    ForcedTermination,
    /// An on-screen alarm fires but play continues.
    Alarm,
}

/// Preset restriction levels. Wire spellings differ from the variant
/// names for the age-band presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum FunctionalRestrictionLevel {
    #[strum(serialize = "NONE")]
    #[serde(rename = "NONE")]
    None,
    #[strum(serialize = "CHILDREN")]
    #[serde(rename = "CHILDREN")]
    YoungChild,
    #[strum(serialize = "YOUNG_TEENS")]
    #[serde(rename = "YOUNG_TEENS")]
    YoungTeens,
    #[strum(serialize = "OLDER_TEENS")]
    #[serde(rename = "OLDER_TEENS")]
    Teen,
    #[strum(serialize = "CUSTOM")]
    #[serde(rename = "CUSTOM")]
    Custom,
}

/// Per-application launch gate for restricted software.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SafeLaunchSetting {
    #[default]
    None,
    Allow,
}

/// Alarm visibility states. `ToVisible`/`ToInvisible` are the command
/// forms; the rest are read back from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlarmSettingState {
    Success,
    ToVisible,
    ToInvisible,
    Visible,
    Invisible,
}

/// Canonical lowercase day names used as weekday-regulation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// The canonical lowercase name, as used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }
}

impl From<chrono::Weekday> for DayOfWeek {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
            chrono::Weekday::Sun => Self::Sunday,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn wire_spellings() {
        assert_eq!(TimerMode::EachDayOfTheWeek.to_string(), "EACH_DAY_OF_THE_WEEK");
        assert_eq!(RestrictionMode::ForcedTermination.to_string(), "FORCED_TERMINATION");
        assert_eq!(FunctionalRestrictionLevel::YoungChild.to_string(), "CHILDREN");
        assert_eq!(FunctionalRestrictionLevel::Teen.to_string(), "OLDER_TEENS");
        assert_eq!(SafeLaunchSetting::Allow.to_string(), "ALLOW");
        assert_eq!(AlarmSettingState::ToInvisible.to_string(), "TO_INVISIBLE");
    }

    #[test]
    fn day_names_parse_lowercase_only() {
        assert_eq!(DayOfWeek::from_str("wednesday").unwrap(), DayOfWeek::Wednesday);
        assert!(DayOfWeek::from_str("Wednesday").is_err());
        assert!(DayOfWeek::from_str("someday").is_err());
    }
}
