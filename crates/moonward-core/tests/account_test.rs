// Tests for the Account aggregator: discovery, initial sync tolerance,
// and re-discovery.

mod common;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{
    DEVICE_ID, client, daily_body, device_record, devices_body, mount_device_endpoints,
    settings_body, whitelist_entry,
};
use moonward_core::api::Error as ApiError;
use moonward_core::{Account, CoreError};

async fn mount_device_list(server: &MockServer, records: &[serde_json::Value]) {
    Mock::given(method("GET"))
        .and(path("/users/ACCOUNT/devices"))
        .and(query_param("filter.device.activated.$eq", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(devices_body(records)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_create_discovers_and_syncs_devices() {
    let server = MockServer::start().await;
    mount_device_list(&server, &[device_record(DEVICE_ID, "Playroom")]).await;
    mount_device_endpoints(
        &server,
        device_record(DEVICE_ID, "Playroom"),
        daily_body(42),
        settings_body("etag-1", 180, &[whitelist_entry("APP1", "Some Kart Game", "NONE")]),
    )
    .await;

    let account = Account::with_client(client(&server)).await.unwrap();

    assert_eq!(account.account_id(), "ACCOUNT");
    assert_eq!(account.devices().count(), 1);

    let device = account.get_device(DEVICE_ID).unwrap();
    assert!(device.has_synced());
    assert_eq!(device.today_playing_time, 42);

    assert!(matches!(
        account.get_device("OTHER"),
        Err(CoreError::DeviceNotFound { .. })
    ));
}

#[tokio::test]
async fn test_missing_device_list_is_no_devices_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/ACCOUNT/devices"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = Account::with_client(client(&server)).await;
    assert!(matches!(result, Err(CoreError::NoDevicesFound)));
}

#[tokio::test]
async fn test_other_discovery_failures_propagate() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/ACCOUNT/devices"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = Account::with_client(client(&server)).await;
    assert!(matches!(
        result,
        Err(CoreError::Api(ApiError::Http { status: 500, .. }))
    ));
}

#[tokio::test]
async fn test_malformed_device_list_is_a_payload_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/ACCOUNT/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "devices": [] })))
        .mount(&server)
        .await;

    let result = Account::with_client(client(&server)).await;
    assert!(matches!(
        result,
        Err(CoreError::Api(ApiError::Payload { .. }))
    ));
}

#[tokio::test]
async fn test_failed_initial_sync_keeps_the_device() {
    let server = MockServer::start().await;
    mount_device_list(&server, &[device_record(DEVICE_ID, "Playroom")]).await;

    // Every device-scoped fetch fails: the initial sync cannot succeed,
    // but discovery must still retain the device.
    Mock::given(method("GET"))
        .and(path(format!("/devices/{DEVICE_ID}/daily_summaries")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/devices/{DEVICE_ID}/parental_control_setting")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/devices/{DEVICE_ID}/monthly_summaries")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/users/ACCOUNT/devices/{DEVICE_ID}")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let account = Account::with_client(client(&server)).await.unwrap();

    assert_eq!(account.devices().count(), 1);
    assert!(!account.get_device(DEVICE_ID).unwrap().has_synced());
}

#[tokio::test]
async fn test_update_picks_up_newly_paired_devices() {
    let server = MockServer::start().await;
    mount_device_list(&server, &[device_record(DEVICE_ID, "Playroom")]).await;
    mount_device_endpoints(
        &server,
        device_record(DEVICE_ID, "Playroom"),
        daily_body(10),
        settings_body("etag-1", 180, &[]),
    )
    .await;

    let mut account = Account::with_client(client(&server)).await.unwrap();
    assert_eq!(account.devices().count(), 1);

    // A second console gets paired; its device-scoped fetches fail but
    // it still joins the collection, and the first device keeps its
    // instance (and the refreshed label).
    server.reset().await;
    mount_device_list(
        &server,
        &[
            device_record(DEVICE_ID, "Playroom (renamed)"),
            device_record("DEV2", "Bedroom"),
        ],
    )
    .await;
    mount_device_endpoints(
        &server,
        device_record(DEVICE_ID, "Playroom (renamed)"),
        daily_body(15),
        settings_body("etag-2", 180, &[]),
    )
    .await;

    account.update().await.unwrap();

    assert_eq!(account.devices().count(), 2);
    let first = account.get_device(DEVICE_ID).unwrap();
    assert_eq!(first.name, "Playroom (renamed)");
    assert_eq!(first.today_playing_time, 15);
    assert!(!account.get_device("DEV2").unwrap().has_synced());
}
