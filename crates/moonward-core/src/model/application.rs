// ── Application domain model ──

use chrono::NaiveDate;
use tracing::debug;

use moonward_api::types::{DailySummary, WhitelistedApplication};

use crate::convert;
use crate::model::enums::SafeLaunchSetting;

/// One whitelisted application on one device.
///
/// Constructed the first time its id appears in the device's whitelist
/// and never removed afterwards -- the service treats the whitelist as
/// append-only, and consumers may hold on to historical entries. State
/// is pushed in by the owning device after every sync.
#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    pub application_id: String,
    pub name: String,
    pub first_played_date: Option<NaiveDate>,
    pub image_url: Option<String>,
    pub has_ugc: Option<bool>,
    pub shop_url: Option<String>,
    /// Total distinct days this application has been played.
    pub playing_days: Option<u32>,
    /// Minutes played today, summed across every profile.
    pub today_time_played: u32,
    pub safe_launch: SafeLaunchSetting,
}

impl Application {
    pub(crate) fn from_whitelist(entry: &WhitelistedApplication) -> Self {
        let mut app = Self {
            application_id: entry.application_id.clone(),
            name: String::new(),
            first_played_date: None,
            image_url: None,
            has_ugc: None,
            shop_url: None,
            playing_days: None,
            today_time_played: 0,
            safe_launch: SafeLaunchSetting::default(),
        };
        app.apply_whitelist(entry);
        app
    }

    /// Push callback invoked by the owning device after each sync.
    ///
    /// `entry` is this application's current whitelist entry, if the
    /// whitelist still carries it; `today` is the most recent daily
    /// summary. Metadata is only overwritten from a present entry, so a
    /// dropped whitelist entry leaves the last known values intact.
    pub(crate) fn refresh(
        &mut self,
        entry: Option<&WhitelistedApplication>,
        today: Option<&DailySummary>,
    ) {
        match entry {
            Some(entry) => self.apply_whitelist(entry),
            None => debug!(
                application = %self.application_id,
                "not in the current whitelist, keeping last known metadata"
            ),
        }

        // An application may be played by several profiles in one day;
        // today's total is the sum across all of them.
        self.today_time_played = today.map_or(0, |summary| {
            summary
                .players
                .iter()
                .flat_map(|player| &player.played_apps)
                .filter(|app| app.application_id == self.application_id)
                .map(|app| app.playing_time)
                .sum()
        });
    }

    fn apply_whitelist(&mut self, entry: &WhitelistedApplication) {
        if let Some(title) = &entry.title {
            self.name = title.clone();
        }
        if let Some(image) = entry.image_uri.as_ref().and_then(|i| i.small.clone()) {
            self.image_url = Some(image);
        }
        if entry.first_play_date.is_some() {
            self.first_played_date = entry.first_play_date;
        }
        if entry.has_ugc.is_some() {
            self.has_ugc = entry.has_ugc;
        }
        if let Some(shop) = &entry.shop_uri {
            self.shop_url = Some(shop.clone());
        }
        if entry.playing_days.is_some() {
            self.playing_days = entry.playing_days;
        }
        self.safe_launch = convert::safe_launch(entry.safe_launch.as_deref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moonward_api::types::{DailyPlayerSummary, PlayedApp, PlayerProfile};
    use serde_json::Map;

    fn entry(id: &str, title: &str) -> WhitelistedApplication {
        WhitelistedApplication {
            application_id: id.into(),
            title: Some(title.into()),
            image_uri: None,
            first_play_date: None,
            has_ugc: Some(true),
            shop_uri: Some("https://shop.example/app".into()),
            playing_days: Some(12),
            safe_launch: Some("ALLOW".into()),
            extra: Map::new(),
        }
    }

    fn played(id: &str, minutes: u32) -> PlayedApp {
        PlayedApp {
            application_id: id.into(),
            playing_time: minutes,
            title: None,
            first_play_date: None,
            has_ugc: None,
            image_uri: None,
            shop_uri: None,
            playing_days: None,
            extra: Map::new(),
        }
    }

    fn player(player_id: &str, apps: Vec<PlayedApp>) -> DailyPlayerSummary {
        DailyPlayerSummary {
            profile: PlayerProfile {
                player_id: player_id.into(),
                nickname: player_id.into(),
                image_uri: None,
                extra: Map::new(),
            },
            playing_time: apps.iter().map(|a| a.playing_time).sum(),
            played_apps: apps,
            extra: Map::new(),
        }
    }

    #[test]
    fn today_time_sums_across_profiles() {
        let mut app = Application::from_whitelist(&entry("APP1", "Some Game"));
        let summary = DailySummary {
            date: chrono::NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
            playing_time: 75,
            disabled_time: 0,
            exceeded_time: 0,
            players: vec![
                player("P1", vec![played("APP1", 30), played("APP2", 10)]),
                player("P2", vec![played("APP1", 45)]),
            ],
            extra: Map::new(),
        };

        app.refresh(Some(&entry("APP1", "Some Game")), Some(&summary));

        assert_eq!(app.today_time_played, 75);
        assert_eq!(app.safe_launch, SafeLaunchSetting::Allow);
    }

    #[test]
    fn dropped_whitelist_entry_keeps_metadata() {
        let mut app = Application::from_whitelist(&entry("APP1", "Some Game"));
        assert_eq!(app.name, "Some Game");

        app.refresh(None, None);

        assert_eq!(app.name, "Some Game");
        assert_eq!(app.shop_url.as_deref(), Some("https://shop.example/app"));
        assert_eq!(app.today_time_played, 0);
    }
}
