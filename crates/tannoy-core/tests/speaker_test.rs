#![allow(clippy::unwrap_used)]
// Integration tests for the `Speaker` entity against a wiremock stub
// device: lifecycle contract, play orchestration, auth recovery, and
// the availability flag.

use std::io::Write;

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tannoy_core::{CoreError, PlaybackState, ResolvedMedia, Speaker, SpeakerConfig};

// ── Helpers ─────────────────────────────────────────────────────────

fn config_for(server: &MockServer) -> SpeakerConfig {
    let host = server.uri().trim_start_matches("http://").to_owned();
    let secret: SecretString = "secret".to_string().into();
    SpeakerConfig::new(host, "admin", secret)
}

async fn mount_login(server: &MockServer, expected_logins: u64) {
    Mock::given(method("POST"))
        .and(path("/prod-api/uer/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"token": "t0k3n"}})),
        )
        .expect(expected_logins)
        .mount(server)
        .await;
}

async fn mount_device_info(server: &MockServer, volume: i64) {
    Mock::given(method("GET"))
        .and(path("/prod-api/device/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": {
                "mac": "AA:BB:CC:DD:EE:FF",
                "model": "VCS-SH30",
                "version": "2.400",
                "aoVol": volume
            }
        })))
        .mount(server)
        .await;
}

fn listing(files: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"code": 200, "data": {"files": files}}))
}

fn mp3_fixture() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".mp3").tempfile().unwrap();
    file.write_all(b"ID3\x04\x00fake-mp3-payload").unwrap();
    file
}

// ── Lifecycle ───────────────────────────────────────────────────────

#[tokio::test]
async fn connect_builds_identity_from_device_info() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;
    mount_device_info(&server, 4).await;

    let speaker = Speaker::connect(config_for(&server)).await.unwrap();

    assert_eq!(speaker.unique_id().as_str(), "aa:bb:cc:dd:ee:ff");
    assert_eq!(speaker.identity().model, "VCS-SH30");
    assert_eq!(speaker.identity().manufacturer, "Dahua");
    assert_eq!(speaker.name(), "Dahua Speaker");
    assert!((speaker.volume_level() - 0.4).abs() < f64::EPSILON);
    assert!(speaker.is_available());
    assert_eq!(speaker.playback_state(), PlaybackState::Idle);

    speaker.close();
}

#[tokio::test]
async fn connect_refused_maps_to_not_ready() {
    // Nothing listens on the discard port.
    let secret: SecretString = "secret".to_string().into();
    let config = SpeakerConfig::new("127.0.0.1:1", "admin", secret);

    let result = Speaker::connect(config).await;
    match result {
        Err(err @ CoreError::NotReady { .. }) => assert!(err.is_not_ready()),
        other => panic!("expected NotReady, got: {other:?}"),
    }
}

#[tokio::test]
async fn connect_rejected_credentials_map_to_auth_required() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/prod-api/uer/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"code": 400, "message": "incorrect username or password"})),
        )
        .mount(&server)
        .await;

    let result = Speaker::connect(config_for(&server)).await;
    assert!(matches!(result, Err(CoreError::AuthRequired { .. })));
}

// ── Volume ──────────────────────────────────────────────────────────

#[tokio::test]
async fn volume_round_trip_uses_device_confirmed_value() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;
    mount_device_info(&server, 4).await;

    Mock::given(method("POST"))
        .and(path("/prod-api/device/edit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200, "aoVol": 7})))
        .mount(&server)
        .await;

    let speaker = Speaker::connect(config_for(&server)).await.unwrap();
    let confirmed = speaker.set_volume_level(0.7).await.unwrap();

    assert!((confirmed - 0.7).abs() < f64::EPSILON);
    assert!((speaker.volume_level() - 0.7).abs() < f64::EPSILON);
}

#[tokio::test]
async fn out_of_range_volume_is_rejected_locally() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;
    mount_device_info(&server, 4).await;

    let speaker = Speaker::connect(config_for(&server)).await.unwrap();
    let result = speaker.set_volume_level(1.5).await;
    assert!(matches!(result, Err(CoreError::ValidationFailed { .. })));
}

// ── Refresh / playback state ────────────────────────────────────────

#[tokio::test]
async fn refresh_derives_playing_state_from_listing() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;
    mount_device_info(&server, 4).await;

    Mock::given(method("GET"))
        .and(path("/prod-api/program/info"))
        .respond_with(listing(json!([
            {"name": "a.mp3", "id": 1, "playStatus": 0},
            {"name": "b.mp3", "id": 2, "playStatus": 1}
        ])))
        .mount(&server)
        .await;

    let speaker = Speaker::connect(config_for(&server)).await.unwrap();
    let mut state_rx = speaker.subscribe_state();

    speaker.refresh().await.unwrap();

    assert_eq!(speaker.playback_state(), PlaybackState::Playing);
    assert!(state_rx.has_changed().unwrap());
}

// ── Play orchestration ──────────────────────────────────────────────

#[tokio::test]
async fn repeated_play_of_same_name_never_re_uploads() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;
    mount_device_info(&server, 4).await;

    Mock::given(method("GET"))
        .and(path("/prod-api/program/info"))
        .respond_with(listing(json!([{"name": "chime.mp3", "id": 9, "playStatus": 0}])))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/prod-api/program/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200})))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/prod-api/program/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200})))
        .expect(2)
        .mount(&server)
        .await;

    let speaker = Speaker::connect(config_for(&server)).await.unwrap();
    let mp3 = mp3_fixture();
    let media = ResolvedMedia::local(mp3.path()).named("chime.mp3");

    speaker.play(&media).await.unwrap();
    speaker.play(&media).await.unwrap();
}

#[tokio::test]
async fn first_play_uploads_then_starts_playback() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;
    mount_device_info(&server, 4).await;

    // First listing is empty (triggers the upload); the re-fetch inside
    // the upload verification then sees the file.
    Mock::given(method("GET"))
        .and(path("/prod-api/program/info"))
        .respond_with(listing(json!([])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/prod-api/program/info"))
        .respond_with(listing(json!([{"name": "chime.mp3", "id": 9, "playStatus": 0}])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/prod-api/program/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/prod-api/program/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200})))
        .expect(1)
        .mount(&server)
        .await;

    let speaker = Speaker::connect(config_for(&server)).await.unwrap();
    let mp3 = mp3_fixture();
    let media = ResolvedMedia::local(mp3.path()).named("chime.mp3");

    speaker.play(&media).await.unwrap();
}

#[tokio::test]
async fn play_rejects_non_mp3_before_touching_the_network() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;
    mount_device_info(&server, 4).await;

    let speaker = Speaker::connect(config_for(&server)).await.unwrap();

    // No program mocks are mounted: a ValidationFailed (rather than a
    // connection error) proves the gate fired before any request.
    let media = ResolvedMedia::local("/music/speech.wav");
    let result = speaker.play(&media).await;
    assert!(matches!(result, Err(CoreError::ValidationFailed { .. })));
}

#[tokio::test]
async fn play_existing_unknown_name_is_media_not_found() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;
    mount_device_info(&server, 4).await;

    Mock::given(method("GET"))
        .and(path("/prod-api/program/info"))
        .respond_with(listing(json!([])))
        .mount(&server)
        .await;

    let speaker = Speaker::connect(config_for(&server)).await.unwrap();
    let result = speaker.play_existing("ghost.mp3").await;
    assert!(matches!(result, Err(CoreError::MediaNotFound { .. })));
}

// ── Auth recovery ───────────────────────────────────────────────────

#[tokio::test]
async fn expired_token_triggers_relogin_and_retry() {
    let server = MockServer::start().await;
    // One login at connect, one re-login after the 401.
    mount_login(&server, 2).await;
    mount_device_info(&server, 4).await;

    Mock::given(method("GET"))
        .and(path("/prod-api/program/info"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"code": 401, "message": "token expired"})),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/prod-api/program/info"))
        .respond_with(listing(json!([{"name": "a.mp3", "id": 1, "playStatus": 0}])))
        .mount(&server)
        .await;

    let speaker = Speaker::connect(config_for(&server)).await.unwrap();
    let files = speaker.files().await.unwrap();
    assert!(files.contains_key("a.mp3"));
}

// ── Availability ────────────────────────────────────────────────────

#[tokio::test]
async fn lost_connection_marks_speaker_unavailable() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;
    mount_device_info(&server, 4).await;

    let speaker = Speaker::connect(config_for(&server)).await.unwrap();
    let mut availability = speaker.subscribe_availability();
    assert!(speaker.is_available());

    // Kill the stub device.
    drop(server);

    let result = speaker.refresh().await;
    assert!(result.is_err());
    assert!(!speaker.is_available());
    assert!(availability.has_changed().unwrap());
    assert!(!*availability.borrow_and_update());
}
