// ABOUTME: End-to-end adapter tests against a mocked PowerTraxx API
// ABOUTME: OAuth handshake, activity list, detail decoding, upload mode selection, delete
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use fitsync_core::{
    Activity, ActivityType, Lap, Location, ProviderError, Waypoint, WaypointKind,
};
use fitsync_powertraxx::provider::ActivitySummary;
use fitsync_powertraxx::{
    PowerTraxxConfig, PowerTraxxService, ServiceRecord, TokenRecord, TokenStore,
};
use wiremock::matchers::{
    body_partial_json, body_string_contains, header, method, path, query_param,
    query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(base: &str) -> PowerTraxxConfig {
    PowerTraxxConfig::new("client-id", "client-secret", base, "https://sync.example")
}

/// Adapter plus binding with a valid token pre-seeded, so tests exercise the
/// operation under test rather than the refresh path.
async fn authorized_service(server: &MockServer) -> (PowerTraxxService, ServiceRecord) {
    let store = Arc::new(TokenStore::new());
    let token = TokenRecord::from_exchange(
        "valid-token".to_owned(),
        "refresh-1".to_owned(),
        3600,
        Utc::now(),
    );
    store.insert("user-1", token.clone()).await;
    let service = PowerTraxxService::new(config(&server.uri()), store);
    let record = ServiceRecord::new("user-1", token);
    (service, record)
}

fn summary(id: &str, activity_type: ActivityType) -> ActivitySummary {
    ActivitySummary {
        external_id: id.to_owned(),
        name: Some("Morning run".to_owned()),
        activity_type,
        distance_meters: Some(10000.0),
        start_time: Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap(),
        end_time: Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
    }
}

// ============================================================================
// OAuth Handshake Tests
// ============================================================================

#[test]
fn authorization_url_carries_the_grant_parameters() {
    let service = PowerTraxxService::new(
        config("https://www.powertraxx.example"),
        Arc::new(TokenStore::new()),
    );
    let url = service.authorization_url().unwrap();

    assert!(url.starts_with("https://www.powertraxx.example/authorize?"));
    assert!(url.contains("scope=activity"));
    assert!(url.contains("client_id=client-id"));
    assert!(url.contains("state=ptr_api"));
    assert!(url.contains("response_type=code"));
    assert!(url.contains("redirect_uri=https%3A%2F%2Fsync.example%2Foauth%2Freturn%2Fpowertraxx"));
}

#[test]
fn authorization_url_rejects_missing_client_id() {
    let service = PowerTraxxService::new(
        PowerTraxxConfig::new("", "secret", "https://x.example", "https://sync.example"),
        Arc::new(TokenStore::new()),
    );
    assert!(matches!(
        service.authorization_url(),
        Err(ProviderError::InvalidConfig { .. })
    ));
}

#[tokio::test]
async fn code_exchange_yields_the_external_id_and_token_pair() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=abc"))
        .and(body_string_contains(
            "redirect_uri=https%3A%2F%2Fsync.example%2Foauth%2Freturn%2Fpowertraxx",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "new-access",
            "refresh_token": "new-refresh",
            "expires_in": 3600,
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/account/userinfo"))
        .and(header("Authorization", "Bearer new-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Id": "user-42",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = PowerTraxxService::new(config(&server.uri()), Arc::new(TokenStore::new()));
    let (external_id, token) = service.retrieve_authorization_token("abc").await.unwrap();

    assert_eq!(external_id, "user-42");
    assert_eq!(token.access_token, "new-access");
    assert_eq!(token.refresh_token, "new-refresh");
    assert!(token.is_valid_at(Utc::now()));
}

#[tokio::test]
async fn rejected_code_exchange_is_a_blocking_authorization_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
        .mount(&server)
        .await;

    let service = PowerTraxxService::new(config(&server.uri()), Arc::new(TokenStore::new()));
    let err = service
        .retrieve_authorization_token("bad")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProviderError::Authorization { status: 400, .. }
    ));
    assert!(err.blocks_sync());
}

// ============================================================================
// Activity List Tests
// ============================================================================

#[tokio::test]
async fn incremental_list_requests_a_bounded_page_and_maps_sports() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/activity/list"))
        .and(query_param("count", "25"))
        .and(header("Authorization", "Bearer valid-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "Id": "act-1",
                "SportType": "mountainbike",
                "Distance": 24500.5,
                "StartDate": "2025-06-01T08:00:00Z",
                "EndDate": "2025-06-01T10:30:00Z",
                "Name": "Trail loop",
            },
            {
                "Id": "act-2",
                "SportType": "unicycling",
                "Distance": null,
                "StartDate": "2025-06-02T07:00:00+02:00",
                "EndDate": "2025-06-02T08:00:00+02:00",
                "Name": null,
            },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let (service, record) = authorized_service(&server).await;
    let summaries = service
        .download_activity_list(&record, false)
        .await
        .unwrap();

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].external_id, "act-1");
    assert_eq!(summaries[0].activity_type, ActivityType::MountainBiking);
    assert_eq!(summaries[0].distance_meters, Some(24500.5));
    assert_eq!(summaries[0].name.as_deref(), Some("Trail loop"));
    // Unknown sport codes degrade to Other rather than failing the page.
    assert_eq!(summaries[1].activity_type, ActivityType::Other);
    assert_eq!(summaries[1].name, None);
    // Offset timestamps are normalized to UTC.
    assert_eq!(
        summaries[1].start_time,
        Utc.with_ymd_and_hms(2025, 6, 2, 5, 0, 0).unwrap()
    );
}

#[tokio::test]
async fn exhaustive_list_omits_the_page_bound() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/activity/list"))
        .and(query_param_is_missing("count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let (service, record) = authorized_service(&server).await;
    let summaries = service.download_activity_list(&record, true).await.unwrap();
    assert!(summaries.is_empty());
}

#[tokio::test]
async fn unauthorized_list_blocks_rather_than_reporting_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/activity/list"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token rejected"))
        .mount(&server)
        .await;

    let (service, record) = authorized_service(&server).await;
    let err = service
        .download_activity_list(&record, false)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProviderError::Authorization { status: 401, .. }
    ));
    assert!(err.blocks_sync());
}

#[tokio::test]
async fn unparseable_list_body_surfaces_as_decode_with_the_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/activity/list"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let (service, record) = authorized_service(&server).await;
    let err = service
        .download_activity_list(&record, false)
        .await
        .unwrap_err();
    match err {
        ProviderError::Decode { status, body, .. } => {
            assert_eq!(status, 200);
            assert!(body.contains("login"));
        }
        other => panic!("expected Decode, got {other:?}"),
    }
}

// ============================================================================
// Activity Download Tests
// ============================================================================

#[tokio::test]
async fn download_decodes_the_point_stream_with_pause_tagging() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/activity/act-1"))
        .and(header("Authorization", "Bearer valid-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Comment": "felt great",
            "HasGps": true,
            "IsPublic": false,
            "Points": [
                {
                    "TimeStamp": "2025-06-01T08:00:00Z",
                    "Lat": 47.0, "Lon": 8.0, "Elevation": 430.0,
                    "Speed": 36.0, "Heartrate": 140.0, "Distance": 0.0,
                    "Pause": null,
                },
                {
                    "TimeStamp": "2025-06-01T08:10:00Z",
                    "Lat": 47.01, "Lon": 8.01,
                    "Pause": 1,
                },
                {
                    "TimeStamp": "2025-06-01T08:20:00Z",
                    "Lat": 47.02, "Lon": 8.02,
                    "Pause": null,
                },
                {
                    "TimeStamp": "2025-06-01T08:30:00Z",
                    "Lat": 47.03,
                    "Pause": null,
                },
            ],
        })))
        .mount(&server)
        .await;

    let (service, record) = authorized_service(&server).await;
    let activity = service
        .download_activity(&record, &summary("act-1", ActivityType::Cycling))
        .await
        .unwrap();

    assert_eq!(activity.notes.as_deref(), Some("felt great"));
    assert!(activity.gps);
    assert!(activity.private);
    assert!(!activity.stationary);
    assert_eq!(activity.laps.len(), 1);

    let waypoints = &activity.laps[0].waypoints;
    let kinds: Vec<WaypointKind> = waypoints.iter().map(|w| w.kind).collect();
    assert_eq!(
        kinds,
        vec![
            WaypointKind::Start,
            WaypointKind::Pause,
            WaypointKind::Resume,
            WaypointKind::End,
        ]
    );
    // 36 km/h arrives as 10 m/s.
    assert_eq!(waypoints[0].speed, Some(10.0));
    assert_eq!(waypoints[0].heart_rate, Some(140.0));
    assert_eq!(
        waypoints[0].location,
        Some(Location {
            latitude: 47.0,
            longitude: 8.0,
            altitude: Some(430.0),
        })
    );
    // A lone latitude without longitude is not a position.
    assert_eq!(waypoints[3].location, None);
}

#[tokio::test]
async fn single_point_detail_is_stationary() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/activity/act-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Comment": null,
            "HasGps": false,
            "IsPublic": true,
            "Points": [
                { "TimeStamp": "2025-06-01T08:00:00Z", "Pause": null },
            ],
        })))
        .mount(&server)
        .await;

    let (service, record) = authorized_service(&server).await;
    let activity = service
        .download_activity(&record, &summary("act-1", ActivityType::Other))
        .await
        .unwrap();

    assert!(activity.stationary);
    assert!(!activity.private);
    // No boundary tags are forced on a degenerate track.
    assert_eq!(activity.laps[0].waypoints[0].kind, WaypointKind::Regular);
}

#[tokio::test]
async fn forbidden_download_is_a_blocking_authorization_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/activity/act-1"))
        .respond_with(ResponseTemplate::new(403).set_body_string("no access"))
        .mount(&server)
        .await;

    let (service, record) = authorized_service(&server).await;
    let err = service
        .download_activity(&record, &summary("act-1", ActivityType::Running))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProviderError::Authorization { status: 403, .. }
    ));
}

// ============================================================================
// Activity Upload Tests
// ============================================================================

fn stationary_swim() -> Activity {
    let start = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
    let mut activity = Activity::new(ActivityType::Swimming, start, end);
    activity.name = Some("Pool session".to_owned());
    activity.gps = false;
    activity.private = true;
    activity.stationary = true;
    activity.stats.distance_meters = Some(2000.0);
    activity.stats.timer_time_seconds = Some(3600.0);
    activity.stats.moving_time_seconds = Some(3300.0);
    activity
}

fn gps_ride() -> Activity {
    let start = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
    let mut activity = Activity::new(ActivityType::Cycling, start, end);
    activity.gps = true;
    let mut lap = Lap::new(start, end);
    let mut first = Waypoint::new(start, WaypointKind::Start);
    first.location = Some(Location {
        latitude: 47.0,
        longitude: 8.0,
        altitude: Some(430.0),
    });
    first.speed = Some(10.0);
    lap.waypoints.push(first);
    lap.waypoints.push(Waypoint::new(end, WaypointKind::End));
    activity.laps.push(lap);
    activity
}

#[tokio::test]
async fn upload_without_track_sends_the_summary_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/activity"))
        .and(header("Authorization", "Bearer valid-token"))
        .and(body_partial_json(serde_json::json!({
            "name": "Pool session",
            "share": false,
            "duration": 3600.0,
            "pause": 300.0,
            "sportType": 6,
            "distance": 2000.0,
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "AcId": "new-1" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (service, record) = authorized_service(&server).await;
    let remote_id = service
        .upload_activity(&record, &stationary_swim())
        .await
        .unwrap();
    assert_eq!(remote_id, "new-1");
}

#[tokio::test]
async fn upload_with_track_sends_the_point_list_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/activity"))
        .and(body_string_contains("activityRawFormatList"))
        .and(body_partial_json(serde_json::json!({
            "activity": { "sportType": 3 },
            "share": true,
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "AcId": "new-2" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (service, record) = authorized_service(&server).await;
    let remote_id = service.upload_activity(&record, &gps_ride()).await.unwrap();
    assert_eq!(remote_id, "new-2");
}

#[tokio::test]
async fn unauthorized_upload_signals_account_expiry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/activity"))
        .respond_with(ResponseTemplate::new(401).set_body_string("trial ended"))
        .mount(&server)
        .await;

    let (service, record) = authorized_service(&server).await;
    let err = service
        .upload_activity(&record, &stationary_swim())
        .await
        .unwrap_err();
    match &err {
        ProviderError::AccountExpired { body, .. } => assert!(body.contains("trial ended")),
        other => panic!("expected AccountExpired, got {other:?}"),
    }
    assert!(err.blocks_sync());
    assert!(err.intervention_required());
}

#[tokio::test]
async fn failed_upload_carries_the_response_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/activity"))
        .respond_with(ResponseTemplate::new(422).set_body_string("duplicate activity"))
        .mount(&server)
        .await;

    let (service, record) = authorized_service(&server).await;
    let err = service
        .upload_activity(&record, &stationary_swim())
        .await
        .unwrap_err();
    match err {
        ProviderError::RemoteService { status, body, .. } => {
            assert_eq!(status, 422);
            assert!(body.contains("duplicate activity"));
        }
        other => panic!("expected RemoteService, got {other:?}"),
    }
}

// ============================================================================
// Activity Delete Tests
// ============================================================================

#[tokio::test]
async fn delete_succeeds_on_2xx() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/activity/act-9"))
        .and(header("Authorization", "Bearer valid-token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let (service, record) = authorized_service(&server).await;
    service.delete_activity(&record, "act-9").await.unwrap();
}

#[tokio::test]
async fn failed_delete_is_a_remote_service_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/activity/act-9"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let (service, record) = authorized_service(&server).await;
    let err = service.delete_activity(&record, "act-9").await.unwrap_err();
    assert!(matches!(
        err,
        ProviderError::RemoteService { status: 500, .. }
    ));
    assert!(err.is_retryable());
}
