use replicate_voiceover::{Error, VoiceConfig, VoiceOverrides};
use serde_json::json;

use crate::mock_server::{token_env, MockReplicate, MODEL_PATH};

#[test]
fn test_missing_credential_makes_no_network_call() {
    let mut fx = MockReplicate::new();
    let prediction = fx.mock_prediction_times(json!("unused"), 0);
    let service = fx.service("RV_TEST_TOKEN_NEVER_SET");

    let err = service
        .generate_from_text("No token", None, None, &VoiceOverrides::new())
        .unwrap_err();

    prediction.assert();
    match err {
        Error::MissingCredential { var } => assert_eq!(var, "RV_TEST_TOKEN_NEVER_SET"),
        other => panic!("expected MissingCredential, got {other:?}"),
    }
}

#[test]
fn test_unexpected_shapes_fail_without_download() {
    for (i, body) in [json!(42), json!(["https://x/a.mp3"]), json!({ "id": "p" })]
        .into_iter()
        .enumerate()
    {
        let mut fx = MockReplicate::new();
        let _m = fx.mock_prediction(body);
        let audio = fx.mock_audio_times("/files/never.mp3", 0);
        let service = fx.service(&token_env(&format!("shape_{i}")));

        let err = service
            .generate_from_text("Odd", None, None, &VoiceOverrides::new())
            .unwrap_err();

        audio.assert();
        assert!(matches!(err, Error::UnexpectedResponse { .. }), "{err:?}");
        assert!(fx.cache_listing().is_empty());
    }
}

#[test]
fn test_failed_prediction_surfaces_provider_error() {
    let mut fx = MockReplicate::new();
    let _m = fx.mock_prediction(json!({
        "id": "p-fail",
        "status": "failed",
        "error": "voice_id not found",
    }));
    let service = fx.service(&token_env("failed_prediction"));

    let err = service
        .generate_from_text("Bad voice", None, None, &VoiceOverrides::new())
        .unwrap_err();

    match err {
        Error::Prediction { id, status, message } => {
            assert_eq!(id, "p-fail");
            assert_eq!(status, "failed");
            assert_eq!(message, "voice_id not found");
        }
        other => panic!("expected Prediction, got {other:?}"),
    }
}

#[test]
fn test_provider_http_error_propagates() {
    let mut fx = MockReplicate::new();
    let _m = fx
        .server
        .mock("POST", MODEL_PATH)
        .with_status(401)
        .with_body(r#"{"detail":"Invalid token."}"#)
        .create();
    let service = fx.service(&token_env("provider_401"));

    let err = service
        .generate_from_text("Denied", None, None, &VoiceOverrides::new())
        .unwrap_err();

    assert!(err.is_network());
    assert_eq!(err.status(), Some(401));
}

#[test]
fn test_failed_download_leaves_no_partial_file() {
    let mut fx = MockReplicate::new();
    let url = fx.audio_url("/files/missing.mp3");
    let _m = fx.mock_prediction(json!({ "id": "p", "status": "succeeded", "output": url }));
    let _m = fx
        .server
        .mock("GET", "/files/missing.mp3")
        .with_status(404)
        .create();
    let service = fx.service(&token_env("download_404"));

    let err = service
        .generate_from_text("Gone", None, Some("gone.mp3"), &VoiceOverrides::new())
        .unwrap_err();

    assert!(matches!(err, Error::Remote { status: 404, .. }), "{err:?}");
    assert!(fx.cache_listing().is_empty());
}

#[test]
fn test_malformed_model_is_rejected_before_request() {
    let mut fx = MockReplicate::new();
    let any_post = fx
        .server
        .mock("POST", mockito::Matcher::Any)
        .expect(0)
        .create();
    let service = fx.service_with(
        VoiceConfig::default().with_model("speech-02-hd"),
        &token_env("bad_model"),
    );

    let err = service
        .generate_from_text("Hi", None, None, &VoiceOverrides::new())
        .unwrap_err();

    any_post.assert();
    assert!(matches!(err, Error::Validation { .. }));
}

#[test]
fn test_non_url_string_output_is_rejected() {
    let mut fx = MockReplicate::new();
    let _m = fx.mock_prediction(json!({ "id": "p", "status": "succeeded", "output": "not a url" }));
    let service = fx.service(&token_env("non_url_output"));

    let err = service
        .generate_from_text("Hmm", None, None, &VoiceOverrides::new())
        .unwrap_err();

    assert!(matches!(err, Error::Validation { .. }), "{err:?}");
    assert!(fx.cache_listing().is_empty());
}

#[test]
fn test_audio_path_outside_cache_dir_is_rejected() {
    let mut fx = MockReplicate::new();
    let prediction = fx.mock_prediction_times(json!("unused"), 0);
    let service = fx.service(&token_env("escaping_path"));
    let outside = fx.cache_dir().join("..").join("escaped.mp3");

    for path in ["../escaped.mp3", outside.to_str().unwrap()] {
        let err = service
            .generate_from_text("Stay inside", None, Some(path), &VoiceOverrides::new())
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }), "{path}: {err:?}");
    }

    prediction.assert();
    assert!(!outside.exists());
}
