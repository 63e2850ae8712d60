//! Router tests driven through `tower::ServiceExt::oneshot`.

mod common;

use axum::http::StatusCode;
use common::{Form, Verdict, body_json, body_text, build_app, build_app_with, get, post_multipart};
use repx_core::domain::CameraAngle;
use std::time::Duration;

const VIDEO: &[u8] = b"not really an mp4";

#[tokio::test]
async fn liveness_check() {
    let (app, _) = build_app(Verdict::Valid(0.9));
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");
}

#[tokio::test]
async fn judge_health_reports_backend() {
    let (app, _) = build_app(Verdict::Valid(0.9));
    let response = get(app, "/video-judge/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["vlm_backend"], "vllm_llava");
    assert_eq!(
        json["available_disciplines"],
        serde_json::json!(["pull_up", "dip", "squat"])
    );
}

#[tokio::test]
async fn regulations_for_known_discipline() {
    let (app, _) = build_app(Verdict::Valid(0.9));
    let response = get(app, "/video-judge/regulations/pull_up").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["discipline"], "pull_up");
    assert!(json["regulations"].as_str().unwrap().contains("PULL-UP"));
    assert!(!json["visual_criteria"].as_array().unwrap().is_empty());
    assert_eq!(json["common_invalid_reasons"][0]["code"], "PU001");
    let severity = json["common_invalid_reasons"][0]["severity"].as_str().unwrap();
    assert!(["minor", "major", "critical"].contains(&severity));
}

#[tokio::test]
async fn regulations_for_unknown_discipline() {
    let (app, _) = build_app(Verdict::Valid(0.9));
    let response = get(app, "/video-judge/regulations/bench_press").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Invalid discipline"));
}

#[tokio::test]
async fn disciplines_are_listed() {
    let (app, _) = build_app(Verdict::Valid(0.9));
    let response = get(app, "/video-judge/disciplines").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let disciplines = json["disciplines"].as_array().unwrap();
    assert_eq!(disciplines.len(), 3);
    assert_eq!(disciplines[0]["id"], "pull_up");
}

#[tokio::test]
async fn analyze_returns_judgment() {
    let (app, judge) = build_app(Verdict::Valid(0.9));
    let response = post_multipart(
        app,
        "/video-judge/analyze",
        Form::new()
            .file("video", "attempt.mp4", VIDEO)
            .text("discipline", "pull_up")
            .text("additional_context", "Final attempt")
            .file("secondary_video", "side.mp4", VIDEO),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["discipline"], "pull_up");
    assert_eq!(json["is_valid"], true);
    assert_eq!(json["overall_judgment"], "VALID");
    assert_eq!(json["confidence"], 0.9);
    assert_eq!(json["rep_count"], 1);
    assert_eq!(json["model_used"], "Fake:model");
    assert_eq!(json["below_confidence_threshold"], false);
    assert!(json["judgment_id"].is_string());
    assert!(json["processed_at"].is_string());

    let request = judge.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(request.camera_angle, CameraAngle::Auto);
    assert_eq!(request.video_bytes.as_deref(), Some(VIDEO));
    assert!(request.secondary_video.is_some());
    assert_eq!(request.additional_context.as_deref(), Some("Final attempt"));
}

#[tokio::test]
async fn low_confidence_is_flagged() {
    let (app, _) = build_app(Verdict::Valid(0.4));
    let response = post_multipart(
        app,
        "/video-judge/analyze",
        Form::new().file("video", "a.mp4", VIDEO).text("discipline", "squat"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["below_confidence_threshold"], true);
}

#[tokio::test]
async fn analyze_rejects_bad_input() {
    let cases = [
        (
            Form::new().file("video", "a.mp4", VIDEO).text("discipline", "deadlift"),
            "Invalid discipline",
        ),
        (
            Form::new()
                .file("video", "a.mp4", VIDEO)
                .text("discipline", "dip")
                .text("camera_angle", "overhead"),
            "Invalid camera angle",
        ),
        (
            Form::new().text("discipline", "dip"),
            "Missing required 'video' field",
        ),
        (
            Form::new().file("video", "a.mp4", VIDEO),
            "Missing required 'discipline' field",
        ),
    ];

    for (form, expected) in cases {
        let (app, judge) = build_app(Verdict::Valid(0.9));
        let response = post_multipart(app, "/video-judge/analyze", form).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(
            json["error"].as_str().unwrap().contains(expected),
            "expected {:?} in {}",
            expected,
            json
        );
        assert!(judge.last_request.lock().unwrap().is_none());
    }
}

#[tokio::test]
async fn undecodable_video_is_bad_request() {
    let (app, _) = build_app(Verdict::Undecodable);
    let response = post_multipart(
        app,
        "/video-judge/analyze",
        Form::new().file("video", "a.mp4", VIDEO).text("discipline", "dip"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Could not decode video");
}

#[tokio::test]
async fn missing_ffmpeg_is_server_error() {
    let app = common::build_app_without_ffmpeg();
    let response = post_multipart(
        app,
        "/video-judge/analyze",
        Form::new().file("video", "a.mp4", VIDEO).text("discipline", "squat"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Error processing video");
}

#[tokio::test]
async fn provider_failure_hides_internals() {
    let (app, _) = build_app(Verdict::ProviderDown);
    let response = post_multipart(
        app,
        "/video-judge/analyze",
        Form::new().file("video", "a.mp4", VIDEO).text("discipline", "dip"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Error processing video");
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let mut config = common::test_config();
    config.max_upload_bytes = 64;
    let (app, judge) = build_app_with(config, Verdict::Valid(0.9));

    let big = vec![0u8; 1024];
    let response = post_multipart(
        app,
        "/video-judge/analyze",
        Form::new().file("video", "a.mp4", &big).text("discipline", "dip"),
    )
    .await;

    assert!(response.status().is_client_error());
    assert!(judge.last_request.lock().unwrap().is_none());
}

#[tokio::test]
async fn async_submission_completes() {
    let (app, _) = build_app(Verdict::Valid(0.85));
    let response = post_multipart(
        app.clone(),
        "/video-judge/analyze-async",
        Form::new().file("video", "a.mov", VIDEO).text("discipline", "squat"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "pending");
    assert!(json["message"].as_str().unwrap().contains("status"));
    let id = json["judgment_id"].as_str().unwrap().to_string();

    let uri = format!("/video-judge/status/{}", id);
    let mut status = serde_json::Value::Null;
    for _ in 0..200 {
        let response = get(app.clone(), &uri).await;
        assert_eq!(response.status(), StatusCode::OK);
        status = body_json(response).await;
        if status["status"] == "completed" || status["status"] == "failed" {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(status["status"], "completed");
    assert_eq!(status["judgment_id"], id.as_str());
    assert!(status["submitted_at"].is_string());
    assert_eq!(status["result"]["judgment_id"], id.as_str());
    assert_eq!(status["result"]["confidence"], 0.85);
    assert!(status.get("error").is_none());
}

#[tokio::test]
async fn unknown_status_is_not_found() {
    let (app, _) = build_app(Verdict::Valid(0.9));

    let response = get(app.clone(), "/video-judge/status/not-a-judgment").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Judgment ID not found: not-a-judgment");

    let response = get(
        app,
        "/video-judge/status/6f1c2a64-5d1b-4f3e-9a51-2b8f0c1d2e3f",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
