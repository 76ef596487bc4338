// ── Player domain model ──

use moonward_api::types::{DailyPlayerSummary, MonthlyPlayer, PlayedApp};

/// One profile that has used a device.
///
/// Normalized from two wire shapes: the per-day player block inside a
/// daily summary and the profile+summary pair inside a monthly summary.
/// The owning device rebuilds or updates players on every sync.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub player_id: String,
    pub nickname: String,
    pub image_url: Option<String>,
    /// Minutes played today.
    pub today_playing_time: u32,
    /// Minutes played in the most recent summarized month, if known.
    pub monthly_playing_time: Option<u32>,
    /// Today's played-game records.
    pub played_apps: Vec<PlayedApp>,
}

impl Player {
    pub(crate) fn from_daily(block: &DailyPlayerSummary) -> Self {
        Self {
            player_id: block.profile.player_id.clone(),
            nickname: block.profile.nickname.clone(),
            image_url: block.profile.image_uri.clone(),
            today_playing_time: block.playing_time,
            monthly_playing_time: None,
            played_apps: block.played_apps.clone(),
        }
    }

    pub(crate) fn from_monthly(block: &MonthlyPlayer) -> Self {
        Self {
            player_id: block.profile.player_id.clone(),
            nickname: block.profile.nickname.clone(),
            image_url: block.profile.image_uri.clone(),
            today_playing_time: 0,
            monthly_playing_time: Some(block.summary.playing_time),
            played_apps: Vec::new(),
        }
    }

    /// Re-derive nickname, artwork, today's playtime and app list for an
    /// already-known player. Creating new players is the device's job.
    pub(crate) fn update_from_daily_summary(&mut self, block: &DailyPlayerSummary) {
        self.nickname = block.profile.nickname.clone();
        self.image_url = block.profile.image_uri.clone();
        self.today_playing_time = block.playing_time;
        self.played_apps = block.played_apps.clone();
    }

    pub(crate) fn apply_monthly(&mut self, block: &MonthlyPlayer) {
        self.monthly_playing_time = Some(block.summary.playing_time);
        if self.nickname.is_empty() {
            self.nickname = block.profile.nickname.clone();
        }
        if self.image_url.is_none() {
            self.image_url = block.profile.image_uri.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moonward_api::types::{MonthlyPlayerSummary, PlayerProfile};
    use serde_json::Map;

    fn daily_block(id: &str, nickname: &str, minutes: u32) -> DailyPlayerSummary {
        DailyPlayerSummary {
            profile: PlayerProfile {
                player_id: id.into(),
                nickname: nickname.into(),
                image_uri: Some(format!("https://img.example/{id}.png")),
                extra: Map::new(),
            },
            playing_time: minutes,
            played_apps: Vec::new(),
            extra: Map::new(),
        }
    }

    #[test]
    fn update_from_daily_summary_rederives_fields() {
        let mut player = Player::from_daily(&daily_block("P1", "kiddo", 30));
        player.update_from_daily_summary(&daily_block("P1", "renamed", 95));

        assert_eq!(player.nickname, "renamed");
        assert_eq!(player.today_playing_time, 95);
    }

    #[test]
    fn monthly_block_fills_monthly_total_without_touching_today() {
        let mut player = Player::from_daily(&daily_block("P1", "kiddo", 30));
        let monthly = MonthlyPlayer {
            profile: PlayerProfile {
                player_id: "P1".into(),
                nickname: "kiddo".into(),
                image_uri: None,
                extra: Map::new(),
            },
            summary: MonthlyPlayerSummary {
                playing_time: 1234,
                played_apps: Vec::new(),
                extra: Map::new(),
            },
            extra: Map::new(),
        };

        player.apply_monthly(&monthly);

        assert_eq!(player.monthly_playing_time, Some(1234));
        assert_eq!(player.today_playing_time, 30);
    }
}
