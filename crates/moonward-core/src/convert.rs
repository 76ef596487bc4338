// ── Wire → domain conversions ──
//
// The api crate keeps enum-ish fields as strings (the service owns that
// vocabulary and extends it); this module is the single place where raw
// spellings become typed values. Unknown spellings degrade to sensible
// defaults rather than failing a whole sync.

use std::str::FromStr;

use chrono::NaiveTime;
use tracing::debug;

use moonward_api::types::{BedtimeRegulation, DailyRegulation, WireTime};

use crate::model::enums::{
    FunctionalRestrictionLevel, RestrictionMode, SafeLaunchSetting, TimerMode,
};
use crate::model::regulation::{BedtimeSchedule, DayRegulation};

pub fn timer_mode(raw: Option<&str>) -> TimerMode {
    match raw {
        None => TimerMode::default(),
        Some(raw) => TimerMode::from_str(raw).unwrap_or_else(|_| {
            debug!(raw, "unrecognized timer mode, assuming DAILY");
            TimerMode::default()
        }),
    }
}

pub fn restriction_mode(raw: Option<&str>) -> Option<RestrictionMode> {
    raw.and_then(|raw| RestrictionMode::from_str(raw).ok())
}

pub fn restriction_level(raw: Option<&str>) -> Option<FunctionalRestrictionLevel> {
    raw.and_then(|raw| FunctionalRestrictionLevel::from_str(raw).ok())
}

pub fn safe_launch(raw: Option<&str>) -> SafeLaunchSetting {
    raw.and_then(|raw| SafeLaunchSetting::from_str(raw).ok())
        .unwrap_or_default()
}

/// Wire time of day → `NaiveTime`. Minute resolution, no seconds.
pub fn time_of_day(wire: WireTime) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(u32::from(wire.hour), u32::from(wire.minute), 0)
}

/// `NaiveTime` → wire time of day, truncating seconds.
pub fn wire_time(time: NaiveTime) -> WireTime {
    use chrono::Timelike;
    WireTime {
        hour: u8::try_from(time.hour()).unwrap_or(0),
        minute: u8::try_from(time.minute()).unwrap_or(0),
    }
}

pub fn bedtime_schedule(wire: &BedtimeRegulation) -> BedtimeSchedule {
    BedtimeSchedule {
        enabled: wire.enabled,
        start: wire.starting_time.and_then(time_of_day),
        end: wire.ending_time.and_then(time_of_day),
    }
}

pub fn day_regulation(wire: &DailyRegulation) -> DayRegulation {
    DayRegulation {
        limit_minutes: if wire.time_to_play_in_one_day.enabled {
            wire.time_to_play_in_one_day.limit_time
        } else {
            None
        },
        bedtime: bedtime_schedule(&wire.bedtime),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moonward_api::types::PlayTimeLimit;

    #[test]
    fn unknown_timer_mode_degrades_to_daily() {
        assert_eq!(timer_mode(Some("WEEKLY")), TimerMode::Daily);
        assert_eq!(timer_mode(None), TimerMode::Daily);
        assert_eq!(
            timer_mode(Some("EACH_DAY_OF_THE_WEEK")),
            TimerMode::EachDayOfTheWeek
        );
    }

    #[test]
    fn disabled_limit_reads_as_unlimited() {
        let wire = DailyRegulation {
            time_to_play_in_one_day: PlayTimeLimit {
                enabled: false,
                limit_time: Some(120),
                ..PlayTimeLimit::default()
            },
            ..DailyRegulation::default()
        };
        assert_eq!(day_regulation(&wire).limit_minutes, None);
    }

    #[test]
    fn wire_time_round_trip_drops_seconds() {
        let time = NaiveTime::from_hms_opt(21, 45, 30).unwrap();
        let wire = wire_time(time);
        assert_eq!((wire.hour, wire.minute), (21, 45));
        assert_eq!(time_of_day(wire), NaiveTime::from_hms_opt(21, 45, 0));
    }
}
