use folio_ai::{
    audio, AiBackend, AiError, AiSettings, AspectRatio, EditAction, GeminiClient, QualityTier,
    WritingMode,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GeminiClient {
    let settings = AiSettings {
        base_url: server.uri(),
        ..AiSettings::default()
    };
    GeminiClient::new(settings, Some("test-key".to_string())).unwrap()
}

fn text_response(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{ "content": { "parts": [{ "text": text }] } }]
    }))
}

#[tokio::test]
async fn test_generate_text_fast_tier() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{ "parts": [{ "text": "Name a city" }] }]
        })))
        .respond_with(text_response("Neo-Kyoto"))
        .expect(1)
        .mount(&server)
        .await;

    let text = client_for(&server)
        .generate_text("Name a city", QualityTier::Fast)
        .await
        .unwrap();
    assert_eq!(text, "Neo-Kyoto");
}

#[tokio::test]
async fn test_reasoning_sends_thinking_budget() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-pro:generateContent"))
        .and(body_partial_json(json!({
            "generationConfig": { "thinkingConfig": { "thinkingBudget": 32768 } }
        })))
        .respond_with(text_response("A careful plot outline."))
        .expect(1)
        .mount(&server)
        .await;

    let reply = WritingMode::Complex
        .run(&client_for(&server), "Outline a heist")
        .await
        .unwrap();
    assert_eq!(reply.text, "A careful plot outline.");
    assert!(reply.sources.is_empty());
}

#[tokio::test]
async fn test_retrieval_returns_sources() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .and(body_partial_json(json!({ "tools": [{ "googleSearch": {} }] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Rain is common in Kyoto." }] },
                "groundingMetadata": { "groundingChunks": [
                    { "web": { "uri": "https://example.com/kyoto", "title": "Kyoto weather" } }
                ]}
            }]
        })))
        .mount(&server)
        .await;

    let reply = WritingMode::Research
        .run(&client_for(&server), "Kyoto climate")
        .await
        .unwrap();
    assert_eq!(reply.sources.len(), 1);
    assert_eq!(reply.sources[0].title, "Kyoto weather");
}

#[tokio::test]
async fn test_edit_text_trims_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(text_response("\n  earth \n"))
        .mount(&server)
        .await;

    let text = client_for(&server)
        .edit_text("world", EditAction::Improve)
        .await
        .unwrap();
    assert_eq!(text, "earth");
}

#[tokio::test]
async fn test_api_error_is_distinguishable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED" }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .edit_text("world", EditAction::Expand)
        .await
        .unwrap_err();
    match err {
        AiError::Api { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "Quota exceeded");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_candidates_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .generate_text("hi", QualityTier::Quality)
        .await
        .unwrap_err();
    assert!(matches!(err, AiError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_generate_image_decodes_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/imagen-4.0-generate-001:predict"))
        .and(body_partial_json(json!({ "parameters": { "aspectRatio": "16:9" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "predictions": [{ "bytesBase64Encoded": audio::encode_base64(&[0xff, 0xd8, 0xff]) }]
        })))
        .mount(&server)
        .await;

    let bytes = client_for(&server)
        .generate_image("a neon skyline", AspectRatio::Wide)
        .await
        .unwrap();
    assert_eq!(bytes, vec![0xff, 0xd8, 0xff]);
}

#[tokio::test]
async fn test_synthesize_speech_uses_voice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash-preview-tts:generateContent"))
        .and(body_partial_json(json!({
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": { "voiceConfig": { "prebuiltVoiceConfig": { "voiceName": "Kore" } } }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{
                "inlineData": { "mimeType": "audio/pcm", "data": audio::encode_base64(&[1, 0, 2, 0]) }
            }]}}]
        })))
        .mount(&server)
        .await;

    let pcm = client_for(&server)
        .synthesize_speech("The rain fell.")
        .await
        .unwrap();
    assert_eq!(audio::pcm16_to_f32(&pcm).len(), 2);
}

#[tokio::test]
async fn test_analyze_image_sends_inline_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "contents": [{ "parts": [
                { "inlineData": { "mimeType": "image/png", "data": audio::encode_base64(b"png") } },
                { "text": "Describe this image for an asset library." }
            ]}]
        })))
        .respond_with(text_response("A rainy alley."))
        .expect(1)
        .mount(&server)
        .await;

    let text = client_for(&server)
        .analyze_image("Describe this image for an asset library.", b"png", "image/png")
        .await
        .unwrap();
    assert_eq!(text, "A rainy alley.");
}

#[tokio::test]
async fn test_unconfigured_client_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(text_response("unreachable"))
        .expect(0)
        .mount(&server)
        .await;

    let settings = AiSettings {
        base_url: server.uri(),
        ..AiSettings::default()
    };
    let client = GeminiClient::new(settings, None).unwrap();

    for action in EditAction::ALL {
        let err = client.edit_text("text", action).await.unwrap_err();
        assert!(matches!(err, AiError::NotConfigured));
    }
    assert_eq!(
        AiError::NotConfigured.to_string(),
        "API Key not configured."
    );
}
