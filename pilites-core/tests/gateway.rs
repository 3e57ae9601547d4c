//! RPC gateway: endpoint paths, request bodies and error decoding.

mod common;

use common::FakeTransport;
use pilites_core::rpc::Method;
use pilites_core::show::{ColorOrder, GpioPin};
use pilites_core::{Channel, PilitesError, Play, RpcGateway, ValidationError};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

fn gateway(transport: FakeTransport) -> RpcGateway<FakeTransport> {
    RpcGateway::new(transport)
}

// ── Error messages ───────────────────────────────────────────────

#[tokio::test]
async fn string_detail_is_surfaced_verbatim() {
    let gw = gateway(FakeTransport::new().reply(
        "GET /api/plays/play-x",
        404,
        r#"{"detail": "Play 'play-x' not found."}"#,
    ));
    let err = gw.get_play("play-x").await.unwrap_err();
    assert_eq!(err.to_string(), "Play 'play-x' not found.");
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn field_errors_are_joined() {
    let gw = gateway(FakeTransport::new().reply(
        "POST /api/channels",
        422,
        r#"{"detail": [
            {"loc": ["body", "ledCount"], "msg": "value is not a valid integer"},
            {"loc": ["body", "gpioPin"], "msg": "value is not allowed"}
        ]}"#,
    ));
    let mut channel = Channel::with_defaults("channel-1");
    channel.name = "Main Strand".into();
    let err = gw.upsert_channel(&channel).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "ledCount: value is not a valid integer; gpioPin: value is not allowed"
    );
    assert_eq!(err.status(), Some(422));
}

#[tokio::test]
async fn empty_error_body_falls_back_to_status() {
    let gw = gateway(FakeTransport::new().reply("POST /api/live/next", 500, "{}"));
    let err = gw.live_next().await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP 500");
}

#[tokio::test]
async fn transport_failure_keeps_its_text() {
    let gw = gateway(
        FakeTransport::new().fail("GET /api/channels", "error sending request: connection refused"),
    );
    let err = gw.list_channels().await.unwrap_err();
    assert!(matches!(err, PilitesError::Transport(_)));
    assert_eq!(err.to_string(), "error sending request: connection refused");
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_error() {
    let gw = gateway(FakeTransport::new().reply("GET /api/plays", 200, r#"{"plays": []}"#));
    assert!(matches!(
        gw.list_plays().await,
        Err(PilitesError::Decode(_))
    ));
}

// ── Validation ───────────────────────────────────────────────────

#[tokio::test]
async fn invalid_channel_is_never_sent() {
    let gw = gateway(FakeTransport::new());
    let channel = Channel::with_defaults("channel-1");
    let err = assert_err!(gw.upsert_channel(&channel).await);
    assert!(matches!(
        err,
        PilitesError::Validation(ValidationError::MissingName)
    ));
    assert!(gw.transport().requests().is_empty());
}

// ── Endpoints ────────────────────────────────────────────────────

#[tokio::test]
async fn channel_endpoints() {
    let gw = gateway(FakeTransport::new().reply(
        "GET /api/channels",
        200,
        r#"[{"id": "channel-1", "name": "Main Strand", "gpioPin": 18, "ledCount": 150, "ledType": "ws2811", "colorOrder": "GRB"}]"#,
    ));

    let channels = assert_ok!(gw.list_channels().await);
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0].gpio_pin, GpioPin::Gpio18);
    assert_eq!(channels[0].color_order, ColorOrder::Grb);
    assert_eq!(channels[0].led_count, 150);

    let mut channel = channels[0].clone();
    channel.led_count = 60;
    assert_ok!(gw.upsert_channel(&channel).await);
    assert_ok!(gw.test_channel_white("channel-1").await);
    assert_ok!(gw.test_channel_off("channel-1").await);

    assert_eq!(
        gw.transport().routes(),
        [
            "GET /api/channels",
            "POST /api/channels",
            "POST /api/channels/channel-1/test/white",
            "POST /api/channels/channel-1/test/off",
        ]
    );
    let requests = gw.transport().requests();
    let body = requests[1].body.as_ref().unwrap();
    assert_eq!(body["ledCount"], 60);
    assert_eq!(body["gpioPin"], 18);
    assert_eq!(body["colorOrder"], "GRB");
}

#[tokio::test]
async fn play_endpoints() {
    let gw = gateway(
        FakeTransport::new()
            .reply(
                "GET /api/plays",
                200,
                r#"[{"id": "play-1", "name": "Main Stage"}]"#,
            )
            .reply(
                "GET /api/plays/play-1",
                200,
                r#"{"id": "play-1", "name": "Main Stage", "regions": [], "cues": []}"#,
            ),
    );

    let summaries = gw.list_plays().await.unwrap();
    assert_eq!(summaries[0].name, "Main Stage");

    let play = gw.get_play("play-1").await.unwrap();
    assert_eq!(play, Play::new("play-1", "Main Stage"));

    gw.create_play(&play).await.unwrap();
    gw.update_play(&play).await.unwrap();
    gw.test_region("play-1", "region-2").await.unwrap();
    gw.delete_play("play-1").await.unwrap();

    let requests = gw.transport().requests();
    let shape: Vec<(Method, &str)> = requests
        .iter()
        .map(|r| (r.method, r.path.as_str()))
        .collect();
    assert_eq!(
        shape,
        [
            (Method::Get, "/api/plays"),
            (Method::Get, "/api/plays/play-1"),
            (Method::Post, "/api/plays"),
            (Method::Put, "/api/plays/play-1"),
            (Method::Post, "/api/plays/play-1/regions/region-2/test"),
            (Method::Delete, "/api/plays/play-1"),
        ]
    );
    assert_eq!(
        requests[3].body,
        Some(json!({"id": "play-1", "name": "Main Stage", "regions": [], "cues": []}))
    );
    assert_eq!(requests[5].body, None);
}

#[tokio::test]
async fn session_endpoints() {
    let gw = gateway(
        FakeTransport::new()
            .reply(
                "GET /api/preview/status",
                200,
                r#"{"isRunning": true, "playId": "play-1"}"#,
            )
            .reply(
                "GET /api/live/status",
                200,
                r#"{"isRunning": true, "playId": "play-1", "cueId": "cue-2", "cueName": "Finale", "cueIndex": 1, "isBlackout": true}"#,
            ),
    );

    let preview = gw.preview_status().await.unwrap();
    assert!(preview.is_running);
    gw.start_preview("play-1").await.unwrap();
    gw.preview_next().await.unwrap();
    gw.stop_preview().await.unwrap();

    let live = gw.live_status().await.unwrap();
    assert_eq!(live.cue_name.as_deref(), Some("Finale"));
    assert_eq!(live.cue_index, Some(1));
    assert!(live.is_blackout);
    gw.start_live("play-1").await.unwrap();
    gw.live_next().await.unwrap();
    gw.live_blackout().await.unwrap();
    gw.stop_live().await.unwrap();

    assert_eq!(
        gw.transport().routes(),
        [
            "GET /api/preview/status",
            "POST /api/preview",
            "POST /api/preview/next",
            "POST /api/preview/stop",
            "GET /api/live/status",
            "POST /api/live/start",
            "POST /api/live/next",
            "POST /api/live/blackout",
            "POST /api/live/stop",
        ]
    );
    let requests = gw.transport().requests();
    assert_eq!(requests[1].body, Some(json!({"playId": "play-1"})));
    assert_eq!(requests[5].body, Some(json!({"playId": "play-1"})));
    assert_eq!(requests[2].body, None);
}
