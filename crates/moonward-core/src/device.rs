// ── Device synchronization engine ──
//
// The central orchestrator: owns the mirrored settings document, usage
// summaries, derived time-budget fields, and the Application/Player
// collections for one device. `update()` fans out the four resource
// fetches concurrently, joins them, merges the results, and then runs
// the observer sequence. Mutations follow read-modify-write against the
// settings document; the service echo is always the authoritative new
// state.
//
// Mutation methods are not designed for concurrent invocation against
// the same device: interleaved read-modify-write sequences are
// unsupported, last write wins.

use std::fmt;

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde_json::json;
use tracing::{debug, warn};

use moonward_api::types::{
    DailySummary, MonthlySummary, OwnedDevice, ParentalControlSetting, PlayTimerRegulations,
    RestrictionUpdate,
};
use moonward_api::{ApiClient, Error as ApiError};

use crate::convert;
use crate::error::CoreError;
use crate::model::application::Application;
use crate::model::enums::{
    AlarmSettingState, DayOfWeek, FunctionalRestrictionLevel, RestrictionMode, SafeLaunchSetting,
    TimerMode,
};
use crate::model::player::Player;
use crate::model::regulation::{DayRegulation, remaining_play_time};
use crate::observer::UpdateObserver;

/// Sentinel accepted by playtime setters: no daily cap.
pub const DAILY_PLAYTIME_UNLIMITED: i32 = -1;
/// Largest configurable daily cap, in minutes.
pub const DAILY_PLAYTIME_MAX: i32 = 360;

/// One paired console, mirrored locally.
pub struct Device {
    api: ApiClient,
    device_id: String,

    /// Display label, as configured in the companion app.
    pub name: String,
    /// ISO 8601 timestamp of the last on-console settings sync.
    pub sync_state: Option<String>,
    /// Raw device record: alarm visibility, hardware generation,
    /// camera/model metadata.
    pub extra: OwnedDevice,
    /// Whether timer alarms are currently visible on the console.
    pub alarms_visible: bool,

    /// Day-keyed usage records, most-recent-first.
    pub daily_summaries: Vec<DailySummary>,
    /// Cached most-recent monthly summary, kept across syncs where the
    /// service has none newer to offer.
    pub monthly_summary: Option<MonthlySummary>,

    pub timer_mode: TimerMode,
    /// The regulation in force today (cap + bedtime).
    pub regulation: DayRegulation,
    pub restriction_mode: Option<RestrictionMode>,
    pub functional_restriction_level: Option<FunctionalRestrictionLevel>,

    /// Minutes played today on this device.
    pub today_playing_time: u32,
    /// Minutes played this calendar month, recomputed from scratch each
    /// sync over the bounded daily-summary window.
    pub month_playing_time: u32,
    /// Minutes of play left today, bounded by cap and bedtime.
    pub today_time_remaining: u32,

    settings: Option<ParentalControlSetting>,
    applications: IndexMap<String, Application>,
    players: IndexMap<String, Player>,
    observers: Vec<UpdateObserver>,
}

impl Device {
    // ── Construction ─────────────────────────────────────────────────

    pub(crate) fn from_record(api: ApiClient, record: OwnedDevice) -> Self {
        Self {
            api,
            device_id: record.device_id.clone(),
            name: record.label.clone(),
            sync_state: record
                .parental_control_setting_state
                .as_ref()
                .and_then(|state| state.updated_at.clone()),
            alarms_visible: alarm_visibility(&record),
            extra: record,
            daily_summaries: Vec::new(),
            monthly_summary: None,
            timer_mode: TimerMode::default(),
            regulation: DayRegulation::default(),
            restriction_mode: None,
            functional_restriction_level: None,
            today_playing_time: 0,
            month_playing_time: 0,
            today_time_remaining: 0,
            settings: None,
            applications: IndexMap::new(),
            players: IndexMap::new(),
            observers: Vec::new(),
        }
    }

    /// Look up a single device by id, without going through the account
    /// device list. The returned device has not synced yet.
    pub async fn discover(api: ApiClient, device_id: &str) -> Result<Self, CoreError> {
        let record = api.get_account_device(device_id).await?;
        Ok(Self::from_record(api, record))
    }

    /// Fold in a fresh device record from re-discovery.
    pub(crate) fn refresh_record(&mut self, record: OwnedDevice) {
        self.name = record.label.clone();
        self.sync_state = record
            .parental_control_setting_state
            .as_ref()
            .and_then(|state| state.updated_at.clone());
        self.alarms_visible = alarm_visibility(&record);
        self.extra = record;
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Whether an initial sync has completed.
    pub fn has_synced(&self) -> bool {
        self.settings.is_some()
    }

    /// The mirrored settings document: always the last document the
    /// service confirmed, either from a read or from a write echo.
    pub fn settings(&self) -> Option<&ParentalControlSetting> {
        self.settings.as_ref()
    }

    /// Applications in discovery order. The map never shrinks: ids stay
    /// once seen, even after the whitelist drops them.
    pub fn applications(&self) -> impl Iterator<Item = &Application> {
        self.applications.values()
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn get_application(&self, application_id: &str) -> Result<&Application, CoreError> {
        self.applications
            .get(application_id)
            .ok_or_else(|| CoreError::ApplicationNotFound {
                application_id: application_id.to_owned(),
            })
    }

    pub fn get_player(&self, player_id: &str) -> Result<&Player, CoreError> {
        self.players
            .get(player_id)
            .ok_or_else(|| CoreError::PlayerNotFound {
                player_id: player_id.to_owned(),
            })
    }

    /// The usage record for `date`, tolerating one day of boundary skew:
    /// a miss falls back to the previous calendar day exactly once.
    pub fn get_date_summary(&self, date: NaiveDate) -> Result<&DailySummary, CoreError> {
        if let Some(summary) = self.daily_summaries.iter().find(|s| s.date == date) {
            return Ok(summary);
        }
        if let Some(previous) = date.pred_opt() {
            if let Some(summary) = self.daily_summaries.iter().find(|s| s.date == previous) {
                return Ok(summary);
            }
        }
        Err(CoreError::DateSummaryNotFound { date })
    }

    /// Register an external observer, invoked after every refresh.
    pub fn add_update_observer(&mut self, observer: UpdateObserver) {
        self.observers.push(observer);
    }

    // ── Synchronization ──────────────────────────────────────────────

    /// Refresh all device state from the service.
    ///
    /// The four resource groups (daily summaries, settings document,
    /// monthly summary, device record) are fetched concurrently and
    /// joined before any derived computation runs, against a single
    /// `now` captured once. A failing group propagates -- except the
    /// monthly summary, where "no monthly data yet" is an expected
    /// steady state for new devices.
    pub async fn update(&mut self) -> Result<(), CoreError> {
        debug!(device = %self.device_id, "refreshing device state");

        let (daily, settings, monthly, record) = tokio::join!(
            self.api.get_device_daily_summaries(&self.device_id),
            self.api.get_parental_control_setting(&self.device_id),
            Self::fetch_latest_monthly_summary(&self.api, &self.device_id),
            self.api.get_account_device(&self.device_id),
        );

        let daily = daily?;
        let settings = settings?;
        let monthly = monthly?;
        let record = record?;

        let now = Local::now().naive_local();

        self.refresh_record(record);
        self.daily_summaries = daily.daily_summaries;
        if monthly.is_some() {
            self.monthly_summary = monthly;
        }
        self.settings = Some(settings);

        self.rebuild_players();
        self.recompute_derived(now);
        self.refresh_applications();
        self.notify_observers().await;

        debug!(
            device = %self.device_id,
            players = self.players.len(),
            applications = self.applications.len(),
            remaining = self.today_time_remaining,
            "device refresh complete"
        );
        Ok(())
    }

    /// Fetch the most recent available monthly summary.
    ///
    /// HTTP failures are downgraded to `None` with a log line: new
    /// devices have no monthly data and the rest of the sync must stay
    /// intact. Anything else propagates.
    async fn fetch_latest_monthly_summary(
        api: &ApiClient,
        device_id: &str,
    ) -> Result<Option<MonthlySummary>, CoreError> {
        let index = match api.get_device_monthly_summaries(device_id).await {
            Ok(index) => index,
            Err(ApiError::Http { status, .. }) => {
                debug!(device = device_id, status, "could not fetch monthly summaries");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let Some(latest) = index.available.iter().max_by_key(|e| (e.year, e.month)) else {
            return Ok(None);
        };

        match api
            .get_device_monthly_summary(device_id, latest.year, latest.month)
            .await
        {
            Ok(summary) => Ok(Some(summary)),
            Err(ApiError::Http { status, .. }) => {
                debug!(device = device_id, status, "could not fetch monthly summary");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    // ── Merge ────────────────────────────────────────────────────────

    fn rebuild_players(&mut self) {
        if let Some(today) = self.daily_summaries.first() {
            for block in &today.players {
                match self.players.entry(block.profile.player_id.clone()) {
                    Entry::Occupied(mut entry) => entry.get_mut().update_from_daily_summary(block),
                    Entry::Vacant(entry) => {
                        entry.insert(Player::from_daily(block));
                    }
                }
            }
        }

        if let Some(monthly) = &self.monthly_summary {
            for block in &monthly.players {
                match self.players.entry(block.profile.player_id.clone()) {
                    Entry::Occupied(mut entry) => entry.get_mut().apply_monthly(block),
                    Entry::Vacant(entry) => {
                        entry.insert(Player::from_monthly(block));
                    }
                }
            }
        }
    }

    fn recompute_derived(&mut self, now: NaiveDateTime) {
        let regulations = self.settings.as_ref().map(|s| &s.play_timer_regulations);

        self.timer_mode =
            convert::timer_mode(regulations.and_then(|r| r.timer_mode.as_deref()));
        self.restriction_mode =
            convert::restriction_mode(regulations.and_then(|r| r.restriction_mode.as_deref()));
        self.functional_restriction_level = convert::restriction_level(
            self.settings
                .as_ref()
                .and_then(|s| s.functional_restriction_level.as_deref()),
        );

        let today_wire = match self.timer_mode {
            TimerMode::Daily => regulations.and_then(|r| r.daily_regulations.as_ref()),
            TimerMode::EachDayOfTheWeek => {
                let day = DayOfWeek::from(now.weekday());
                regulations
                    .and_then(|r| r.each_day_of_the_week_regulations.as_ref())
                    .and_then(|week| week.day(day.as_str()))
            }
        };
        self.regulation = today_wire.map(convert::day_regulation).unwrap_or_default();

        self.today_playing_time = self
            .get_date_summary(now.date())
            .map(|summary| summary.playing_time)
            .unwrap_or(0);

        self.month_playing_time = self
            .daily_summaries
            .iter()
            .filter(|s| s.date.year() == now.year() && s.date.month() == now.month())
            .map(|s| s.playing_time)
            .sum();

        let bedtime_end = self.regulation.bedtime.effective_end(self.alarms_visible);
        self.today_time_remaining = remaining_play_time(
            now,
            self.regulation.limit_minutes,
            self.today_playing_time,
            bedtime_end,
        );
    }

    /// The internal callback pass: construct applications for whitelist
    /// entries seen for the first time, then push fresh device state
    /// into every owned application in construction order. Runs before
    /// any external observer.
    fn refresh_applications(&mut self) {
        let whitelist = self
            .settings
            .as_ref()
            .and_then(|s| s.whitelisted_application_list.as_deref())
            .unwrap_or(&[]);

        for entry in whitelist {
            if !self.applications.contains_key(&entry.application_id) {
                self.applications.insert(
                    entry.application_id.clone(),
                    Application::from_whitelist(entry),
                );
            }
        }

        let today = self.daily_summaries.first();
        for application in self.applications.values_mut() {
            let entry = whitelist
                .iter()
                .find(|e| e.application_id == application.application_id);
            application.refresh(entry, today);
        }
    }

    /// The external callback pass: sequential, registration order,
    /// deferred observers awaited before their successors.
    async fn notify_observers(&self) {
        for observer in &self.observers {
            observer.notify(self).await;
        }
    }

    // ── Mutations ────────────────────────────────────────────────────
    //
    // Every mutation validates its input first (no request leaves on
    // invalid input), clones the relevant sub-document, adjusts only the
    // targeted fields, sends the whole section, and adopts the echoed
    // settings document before re-running derived computation and the
    // observer sequence.

    /// Set the device PIN (unlock code).
    pub async fn set_new_pin(&mut self, pin: &str) -> Result<(), CoreError> {
        validate_pin(pin)?;
        let echo = self.api.update_unlock_code(&self.device_id, pin).await?;
        self.adopt_settings(echo).await;
        Ok(())
    }

    /// Choose what happens when the timer expires.
    pub async fn set_restriction_mode(&mut self, mode: RestrictionMode) -> Result<(), CoreError> {
        let mut regulations = self.regulations_snapshot("set_restriction_mode")?;
        regulations.restriction_mode = Some(mode.to_string());
        self.commit_play_timer(regulations).await
    }

    /// Switch between uniform daily limits and per-weekday limits.
    pub async fn set_timer_mode(&mut self, mode: TimerMode) -> Result<(), CoreError> {
        let mut regulations = self.regulations_snapshot("set_timer_mode")?;
        regulations.timer_mode = Some(mode.to_string());
        self.commit_play_timer(regulations).await
    }

    /// Set the evening bedtime alarm. Accepts 16:00-23:00; 00:00
    /// disables the alarm, in which case both window edges are sent as
    /// nulls.
    pub async fn set_bedtime_alarm(&mut self, time: NaiveTime) -> Result<(), CoreError> {
        let end = validate_bedtime_alarm(time)?;
        let mut regulations = self.regulations_snapshot("set_bedtime_alarm")?;
        let daily = regulations.daily_regulations.get_or_insert_default();
        match end {
            Some(end) => {
                daily.bedtime.enabled = true;
                daily.bedtime.ending_time = Some(convert::wire_time(end));
            }
            None => {
                daily.bedtime.enabled = false;
                daily.bedtime.ending_time = None;
                daily.bedtime.starting_time = None;
            }
        }
        self.commit_play_timer(regulations).await
    }

    /// Set the morning end of bedtime (05:00-09:00).
    pub async fn set_bedtime_end_time(&mut self, time: NaiveTime) -> Result<(), CoreError> {
        let start = validate_bedtime_end(time)?;
        let mut regulations = self.regulations_snapshot("set_bedtime_end_time")?;
        let daily = regulations.daily_regulations.get_or_insert_default();
        daily.bedtime.starting_time = Some(convert::wire_time(start));
        self.commit_play_timer(regulations).await
    }

    /// Set the uniform daily cap. `-1` means unlimited; otherwise 0-360
    /// minutes.
    pub async fn update_max_daily_playtime(&mut self, minutes: i32) -> Result<(), CoreError> {
        let limit = validate_daily_minutes(minutes)?;
        let mut regulations = self.regulations_snapshot("update_max_daily_playtime")?;
        let daily = regulations.daily_regulations.get_or_insert_default();
        daily.time_to_play_in_one_day.enabled = limit.is_some();
        daily.time_to_play_in_one_day.limit_time = limit;
        self.commit_play_timer(regulations).await
    }

    /// Set one weekday's cap. Requires the device to already be in
    /// per-weekday mode and a canonical lowercase day name.
    pub async fn set_daily_restrictions(&mut self, day: &str, minutes: i32) -> Result<(), CoreError> {
        if self.timer_mode != TimerMode::EachDayOfTheWeek {
            return Err(CoreError::InvalidDeviceState {
                device_id: self.device_id.clone(),
                operation: "set_daily_restrictions",
                reason: format!("timer mode is {}, expected EACH_DAY_OF_THE_WEEK", self.timer_mode),
            });
        }
        let day: DayOfWeek = day.parse().map_err(|_| {
            CoreError::validation("day_of_week", day, "expected a canonical lowercase day name")
        })?;
        let limit = validate_daily_minutes(minutes)?;

        let mut regulations = self.regulations_snapshot("set_daily_restrictions")?;
        let week = regulations
            .each_day_of_the_week_regulations
            .get_or_insert_default();
        let Some(slot) = week.day_mut(day.as_str()) else {
            return Err(CoreError::validation(
                "day_of_week",
                day,
                "expected a canonical lowercase day name",
            ));
        };
        slot.time_to_play_in_one_day.enabled = limit.is_some();
        slot.time_to_play_in_one_day.limit_time = limit;
        self.commit_play_timer(regulations).await
    }

    /// Apply a preset restriction level.
    pub async fn set_functional_restriction_level(
        &mut self,
        level: FunctionalRestrictionLevel,
    ) -> Result<(), CoreError> {
        let settings = self
            .settings
            .as_ref()
            .ok_or_else(|| self.not_synced("set_functional_restriction_level"))?;

        let update = RestrictionUpdate {
            device_id: self.device_id.clone(),
            custom_settings: settings.custom_settings.clone().unwrap_or_else(|| json!({})),
            vr_restriction_etag: None,
            whitelisted_application_list: None,
            functional_restriction_level: Some(level.to_string()),
            parental_control_setting_etag: settings.etag.clone(),
        };

        let echo = self.api.update_restriction_level(&update).await?;
        self.adopt_settings(echo).await;
        Ok(())
    }

    /// Change one application's safe-launch flag.
    ///
    /// The current whitelist is authoritative: the application must have
    /// survived in it, even if this device still tracks the id from an
    /// earlier sync. The full list is sent with only this entry changed.
    pub async fn set_safe_launch_setting(
        &mut self,
        application_id: &str,
        setting: SafeLaunchSetting,
    ) -> Result<(), CoreError> {
        let settings = self
            .settings
            .as_ref()
            .ok_or_else(|| self.not_synced("set_safe_launch_setting"))?;

        let Some(whitelist) = settings.whitelisted_application_list.clone() else {
            warn!(
                device = %self.device_id,
                application = application_id,
                "settings document carries no application whitelist"
            );
            return Err(CoreError::ApplicationNotFound {
                application_id: application_id.to_owned(),
            });
        };

        let mut whitelist = whitelist;
        let Some(entry) = whitelist
            .iter_mut()
            .find(|e| e.application_id == application_id)
        else {
            return Err(CoreError::ApplicationNotFound {
                application_id: application_id.to_owned(),
            });
        };
        entry.safe_launch = Some(setting.to_string());

        let update = RestrictionUpdate {
            device_id: self.device_id.clone(),
            custom_settings: settings.custom_settings.clone().unwrap_or_else(|| json!({})),
            vr_restriction_etag: None,
            whitelisted_application_list: Some(whitelist),
            functional_restriction_level: None,
            parental_control_setting_etag: settings.etag.clone(),
        };

        let echo = self.api.update_restriction_level(&update).await?;
        self.adopt_settings(echo).await;
        Ok(())
    }

    /// Grant extra playing time for today (`-1` = unlimited for the rest
    /// of the day). The service tracks the grant; local state is
    /// refreshed from authoritative data afterwards.
    pub async fn add_extra_time(&mut self, minutes: i32) -> Result<(), CoreError> {
        validate_extra_minutes(minutes)?;
        self.api
            .update_extra_playing_time(&self.device_id, minutes)
            .await?;
        self.update().await
    }

    /// Show or hide timer alarms on the console for today.
    pub async fn set_alarm_state(&mut self, state: AlarmSettingState) -> Result<(), CoreError> {
        if !matches!(
            state,
            AlarmSettingState::ToVisible | AlarmSettingState::ToInvisible
        ) {
            return Err(CoreError::validation(
                "alarm_state",
                state,
                "expected TO_VISIBLE or TO_INVISIBLE",
            ));
        }

        self.api
            .update_alarm_setting_state(&self.device_id, &state.to_string())
            .await?;

        self.alarms_visible = state == AlarmSettingState::ToVisible;
        self.recompute_derived(Local::now().naive_local());
        self.notify_observers().await;
        Ok(())
    }

    // ── Mutation plumbing ────────────────────────────────────────────

    fn not_synced(&self, operation: &'static str) -> CoreError {
        CoreError::InvalidDeviceState {
            device_id: self.device_id.clone(),
            operation,
            reason: "device has not completed an initial sync".into(),
        }
    }

    /// An owned copy of the play-timer section for structural update.
    /// The mirrored document itself is never mutated in place, so a
    /// failed write cannot leave half-applied local state.
    fn regulations_snapshot(
        &self,
        operation: &'static str,
    ) -> Result<PlayTimerRegulations, CoreError> {
        self.settings
            .as_ref()
            .map(|s| s.play_timer_regulations.clone())
            .ok_or_else(|| self.not_synced(operation))
    }

    async fn commit_play_timer(
        &mut self,
        regulations: PlayTimerRegulations,
    ) -> Result<(), CoreError> {
        let echo = self
            .api
            .update_play_timer(&self.device_id, &regulations)
            .await?;
        self.adopt_settings(echo).await;
        Ok(())
    }

    /// Adopt a settings document echoed by the service as the new
    /// authoritative state, then re-run derived computation and the
    /// observer sequence.
    async fn adopt_settings(&mut self, settings: ParentalControlSetting) {
        self.settings = Some(settings);
        self.recompute_derived(Local::now().naive_local());
        self.refresh_applications();
        self.notify_observers().await;
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("device_id", &self.device_id)
            .field("name", &self.name)
            .field("timer_mode", &self.timer_mode)
            .field("today_playing_time", &self.today_playing_time)
            .field("today_time_remaining", &self.today_time_remaining)
            .field("applications", &self.applications.len())
            .field("players", &self.players.len())
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

fn alarm_visibility(record: &OwnedDevice) -> bool {
    record
        .alarm_setting
        .as_ref()
        .and_then(|alarm| alarm.visibility.as_deref())
        != Some("INVISIBLE")
}

// ── Validation ───────────────────────────────────────────────────────
//
// All validators run before any network call; a violation means no
// request is dispatched at all.

fn validate_daily_minutes(minutes: i32) -> Result<Option<u32>, CoreError> {
    if minutes == DAILY_PLAYTIME_UNLIMITED {
        return Ok(None);
    }
    if (0..=DAILY_PLAYTIME_MAX).contains(&minutes) {
        return Ok(Some(u32::try_from(minutes).unwrap_or(0)));
    }
    Err(CoreError::validation(
        "daily_playtime_range",
        minutes,
        "minutes must be between -1 and 360",
    ))
}

fn validate_extra_minutes(minutes: i32) -> Result<(), CoreError> {
    if minutes == DAILY_PLAYTIME_UNLIMITED || (1..=DAILY_PLAYTIME_MAX).contains(&minutes) {
        return Ok(());
    }
    Err(CoreError::validation(
        "extra_time_range",
        minutes,
        "minutes must be -1 or between 1 and 360",
    ))
}

/// Evening alarm window: 16:00-23:00 inclusive. 00:00 disables.
fn validate_bedtime_alarm(time: NaiveTime) -> Result<Option<NaiveTime>, CoreError> {
    let minutes = time.hour() * 60 + time.minute();
    if minutes == 0 {
        return Ok(None);
    }
    if (16 * 60..=23 * 60).contains(&minutes) {
        return Ok(Some(time));
    }
    Err(CoreError::validation(
        "bedtime_range",
        time,
        "alarm must fall between 16:00 and 23:00, or 00:00 to disable",
    ))
}

/// Morning release window: 05:00-09:00 inclusive.
fn validate_bedtime_end(time: NaiveTime) -> Result<NaiveTime, CoreError> {
    let minutes = time.hour() * 60 + time.minute();
    if (5 * 60..=9 * 60).contains(&minutes) {
        return Ok(time);
    }
    Err(CoreError::validation(
        "bedtime_end_range",
        time,
        "bedtime end must fall between 05:00 and 09:00",
    ))
}
