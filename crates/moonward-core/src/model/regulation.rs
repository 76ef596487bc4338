// ── Regulation value objects and time-budget math ──

use chrono::{NaiveDateTime, NaiveTime, Timelike};

/// Bedtime window as consumers see it: `end` is the evening alarm
/// (play stops), `start` the morning release. When disabled both are
/// absent -- never zero values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BedtimeSchedule {
    pub enabled: bool,
    pub start: Option<NaiveTime>,
    pub end: Option<NaiveTime>,
}

impl BedtimeSchedule {
    /// The evening alarm that actually binds today, if any. Bedtime only
    /// takes effect when the schedule is enabled AND alarms are visible
    /// on the device.
    pub fn effective_end(&self, alarms_visible: bool) -> Option<NaiveTime> {
        if self.enabled && alarms_visible {
            self.end
        } else {
            None
        }
    }
}

/// The regulation in force for one day: minute cap plus bedtime.
/// `limit_minutes` of `None` means unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayRegulation {
    pub limit_minutes: Option<u32>,
    pub bedtime: BedtimeSchedule,
}

/// Whole minutes from `now` until the next midnight. Exactly midnight
/// counts as a full day.
pub fn minutes_until_midnight(now: NaiveDateTime) -> u32 {
    1440 - (now.time().hour() * 60 + now.time().minute())
}

/// Remaining playtime today, in whole minutes.
///
/// Two independent budgets are computed against a single `now` and the
/// smaller one wins:
/// - by limit: cap minus minutes already played (unlimited falls back to
///   minutes until midnight);
/// - by bedtime: minutes until the evening alarm, zero once it has
///   passed (no binding alarm falls back to minutes until midnight).
///
/// The result is always within `[0, 1440]` and never exceeds the
/// minutes left until midnight.
pub fn remaining_play_time(
    now: NaiveDateTime,
    limit_minutes: Option<u32>,
    played_today: u32,
    bedtime_end: Option<NaiveTime>,
) -> u32 {
    let until_midnight = minutes_until_midnight(now);

    let by_limit = match limit_minutes {
        Some(limit) => limit.saturating_sub(played_today),
        None => until_midnight,
    };

    let by_bedtime = match bedtime_end {
        Some(end) => {
            let now_minutes = now.time().hour() * 60 + now.time().minute();
            let end_minutes = end.hour() * 60 + end.minute();
            end_minutes.saturating_sub(now_minutes)
        }
        None => until_midnight,
    };

    by_limit.min(by_bedtime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 7)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn limit_only_when_bedtime_disabled() {
        // 300-minute cap, 100 played, no binding bedtime.
        assert_eq!(remaining_play_time(at(10, 0), Some(300), 100, None), 200);
    }

    #[test]
    fn exhausted_limit_floors_at_zero_even_with_future_bedtime() {
        let bedtime = NaiveTime::from_hms_opt(21, 0, 0).unwrap();
        assert_eq!(remaining_play_time(at(10, 0), Some(60), 60, Some(bedtime)), 0);
        assert_eq!(remaining_play_time(at(10, 0), Some(60), 90, Some(bedtime)), 0);
    }

    #[test]
    fn bedtime_wins_when_closer_than_limit() {
        let bedtime = NaiveTime::from_hms_opt(21, 0, 0).unwrap();
        assert_eq!(
            remaining_play_time(at(20, 30), Some(300), 0, Some(bedtime)),
            30
        );
    }

    #[test]
    fn passed_bedtime_means_zero() {
        let bedtime = NaiveTime::from_hms_opt(21, 0, 0).unwrap();
        assert_eq!(remaining_play_time(at(22, 0), None, 0, Some(bedtime)), 0);
    }

    #[test]
    fn unlimited_is_bounded_by_midnight() {
        assert_eq!(remaining_play_time(at(23, 15), None, 500, None), 45);
        assert_eq!(remaining_play_time(at(0, 0), None, 0, None), 1440);
    }

    #[test]
    fn result_never_exceeds_minutes_until_midnight() {
        for hour in 0..24 {
            let now = at(hour, 30);
            let value = remaining_play_time(now, Some(360), 0, None);
            assert!(value <= minutes_until_midnight(now));
            assert!(value <= 1440);
        }
    }

    #[test]
    fn bedtime_ignored_when_alarms_hidden() {
        let schedule = BedtimeSchedule {
            enabled: true,
            start: None,
            end: NaiveTime::from_hms_opt(19, 0, 0),
        };
        assert!(schedule.effective_end(false).is_none());
        assert!(schedule.effective_end(true).is_some());
    }
}
