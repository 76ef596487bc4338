// Shared fixtures for moonward-core integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::Local;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use moonward_core::api::{ApiClient, StaticTokenProvider};

pub const DEVICE_ID: &str = "DEV1";

pub fn client(server: &MockServer) -> ApiClient {
    let auth = Arc::new(StaticTokenProvider::new("ACCOUNT", "test-token"));
    ApiClient::with_base_url(&server.uri(), auth, "Europe/London", "en-GB").unwrap()
}

pub fn device_record(device_id: &str, label: &str) -> Value {
    json!({
        "deviceId": device_id,
        "label": label,
        "parentalControlSettingState": { "updatedAt": "2026-08-01T10:00:00Z" },
        "alarmSetting": { "visibility": "VISIBLE" },
        "platformGeneration": 1
    })
}

pub fn devices_body(records: &[Value]) -> Value {
    json!({ "ownedDevices": records })
}

/// Daily summaries dated today, so derived today-fields are exercised.
pub fn daily_body(played_today: u32) -> Value {
    let today = Local::now().date_naive();
    json!({
        "dailySummaries": [
            {
                "date": today.format("%Y-%m-%d").to_string(),
                "playingTime": played_today,
                "disabledTime": 0,
                "exceededTime": 5,
                "players": [
                    {
                        "profile": {
                            "playerId": "PLAYER1",
                            "nickname": "kiddo",
                            "imageUri": "https://img.example/p1.png"
                        },
                        "playingTime": played_today,
                        "playedApps": [
                            { "applicationId": "APP1", "playingTime": played_today }
                        ]
                    }
                ]
            }
        ]
    })
}

pub fn whitelist_entry(application_id: &str, title: &str, safe_launch: &str) -> Value {
    json!({
        "applicationId": application_id,
        "title": title,
        "imageUri": { "small": format!("https://img.example/{application_id}.png") },
        "firstPlayDate": "2026-01-15",
        "hasUgc": false,
        "shopUri": format!("https://shop.example/{application_id}"),
        "playingDays": 9,
        "safeLaunch": safe_launch
    })
}

pub fn settings_body(etag: &str, limit_minutes: u32, whitelist: &[Value]) -> Value {
    json!({
        "deviceId": DEVICE_ID,
        "etag": etag,
        "unlockCode": "4321",
        "functionalRestrictionLevel": "CUSTOM",
        "playTimerRegulations": {
            "timerMode": "DAILY",
            "restrictionMode": "ALARM",
            "dailyRegulations": {
                "timeToPlayInOneDay": { "enabled": true, "limitTime": limit_minutes },
                "bedtime": { "enabled": false, "startingTime": null, "endingTime": null }
            }
        },
        "whitelistedApplicationList": whitelist,
        "customSettings": {}
    })
}

pub fn empty_monthly_index() -> Value {
    json!({ "available": [] })
}

/// Mount the four fetch groups for one device against `server`.
pub async fn mount_device_endpoints(
    server: &MockServer,
    record: Value,
    daily: Value,
    settings: Value,
) {
    Mock::given(method("GET"))
        .and(path(format!("/users/ACCOUNT/devices/{DEVICE_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(record))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/devices/{DEVICE_ID}/daily_summaries")))
        .respond_with(ResponseTemplate::new(200).set_body_json(daily))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/devices/{DEVICE_ID}/parental_control_setting")))
        .respond_with(ResponseTemplate::new(200).set_body_json(settings))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/devices/{DEVICE_ID}/monthly_summaries")))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_monthly_index()))
        .mount(server)
        .await;
}
