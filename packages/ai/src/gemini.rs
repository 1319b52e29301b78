//! Gemini REST and live-stream client

use crate::audio;
use crate::live::{self, LiveCommand, LiveEvent, LiveSession};
use crate::{
    AiBackend, AiError, AiResult, AiSettings, AspectRatio, EditAction, GroundedText,
    GroundingSource, QualityTier,
};
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

const LIVE_PATH: &str =
    "/ws/google.ai.generativelanguage.v1beta.GenerativeService.BidiGenerateContent";

/// Client for the Generative Language API
///
/// Credentials are resolved once at construction; without them every
/// operation fails with [`AiError::NotConfigured`] before any request.
pub struct GeminiClient {
    settings: AiSettings,
    api_key: Option<String>,
    client: Client,
}

impl GeminiClient {
    /// Build a client, reading the API key from the environment
    pub fn from_env(settings: AiSettings) -> AiResult<Self> {
        let api_key = settings.api_key_from_env();
        if api_key.is_none() {
            tracing::warn!(
                env = %settings.api_key_env,
                "API key environment variable not set. AI features will not work."
            );
        }
        Self::new(settings, api_key)
    }

    pub fn new(settings: AiSettings, api_key: Option<String>) -> AiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            api_key: api_key
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            settings,
            client,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn settings(&self) -> &AiSettings {
        &self.settings
    }

    fn api_key(&self) -> AiResult<&str> {
        self.api_key.as_deref().ok_or(AiError::NotConfigured)
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        format!(
            "{}/v1beta/models/{}:{}",
            self.settings.base_url.trim_end_matches('/'),
            model,
            method
        )
    }

    /// POST a JSON body and return the decoded JSON response
    async fn post(&self, model: &str, method: &str, body: &Value) -> AiResult<Value> {
        let api_key = self.api_key()?;
        let url = self.model_url(model, method);

        let start = Instant::now();
        let resp = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", api_key)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        let latency_ms = start.elapsed().as_millis() as u64;

        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = api_error_message(&text);
            tracing::warn!(model, method, status = status.as_u16(), latency_ms, %message, "Gemini request failed");
            return Err(AiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!(model, method, latency_ms, "Gemini request succeeded");
        Ok(resp.json().await?)
    }

    async fn generate_content(&self, model: &str, body: Value) -> AiResult<Value> {
        self.post(model, "generateContent", &body).await
    }
}

/// Pull `error.message` out of an error body, falling back to the raw text
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

fn text_request(prompt: &str) -> Value {
    json!({ "contents": [{ "parts": [{ "text": prompt }] }] })
}

fn first_candidate(response: &Value) -> AiResult<&Value> {
    response["candidates"]
        .as_array()
        .and_then(|arr| arr.first())
        .ok_or_else(|| AiError::InvalidResponse("Missing candidates".to_string()))
}

/// Concatenated text parts of the first candidate, skipping thought parts
fn response_text(response: &Value) -> AiResult<String> {
    let parts = first_candidate(response)?["content"]["parts"]
        .as_array()
        .ok_or_else(|| AiError::InvalidResponse("Missing content".to_string()))?;

    let text: String = parts
        .iter()
        .filter(|part| !part["thought"].as_bool().unwrap_or(false))
        .filter_map(|part| part["text"].as_str())
        .collect();

    if text.is_empty() {
        return Err(AiError::InvalidResponse("Missing content".to_string()));
    }
    Ok(text)
}

fn grounding_sources(response: &Value) -> Vec<GroundingSource> {
    response["candidates"][0]["groundingMetadata"]["groundingChunks"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|chunk| {
            let web = &chunk["web"];
            Some(GroundingSource {
                uri: web["uri"].as_str()?.to_string(),
                title: web["title"].as_str().unwrap_or_default().to_string(),
            })
        })
        .collect()
}

fn inline_data(response: &Value) -> AiResult<Vec<u8>> {
    let data = first_candidate(response)?["content"]["parts"]
        .as_array()
        .into_iter()
        .flatten()
        .find_map(|part| part["inlineData"]["data"].as_str())
        .ok_or_else(|| AiError::InvalidResponse("Missing inline data".to_string()))?;
    Ok(audio::decode_base64(data)?)
}

#[async_trait]
impl AiBackend for GeminiClient {
    async fn generate_text(&self, prompt: &str, tier: QualityTier) -> AiResult<String> {
        let model = match tier {
            QualityTier::Fast => &self.settings.fast_model,
            QualityTier::Quality => &self.settings.reasoning_model,
        };
        let response = self.generate_content(model, text_request(prompt)).await?;
        response_text(&response)
    }

    async fn generate_with_reasoning(&self, prompt: &str) -> AiResult<String> {
        let mut body = text_request(prompt);
        body["generationConfig"] = json!({
            "thinkingConfig": { "thinkingBudget": self.settings.thinking_budget }
        });

        let response = self
            .generate_content(&self.settings.reasoning_model, body)
            .await?;
        response_text(&response)
    }

    async fn generate_with_retrieval(&self, prompt: &str) -> AiResult<GroundedText> {
        let mut body = text_request(prompt);
        body["tools"] = json!([{ "googleSearch": {} }]);

        let response = self.generate_content(&self.settings.fast_model, body).await?;
        Ok(GroundedText {
            text: response_text(&response)?,
            sources: grounding_sources(&response),
        })
    }

    async fn edit_text(&self, text: &str, action: EditAction) -> AiResult<String> {
        let prompt = action.prompt(text);
        let response = self
            .generate_content(&self.settings.fast_model, text_request(&prompt))
            .await?;
        Ok(response_text(&response)?.trim().to_string())
    }

    async fn analyze_image(&self, prompt: &str, image: &[u8], mime_type: &str) -> AiResult<String> {
        let body = json!({
            "contents": [{
                "parts": [
                    { "inlineData": { "mimeType": mime_type, "data": audio::encode_base64(image) } },
                    { "text": prompt }
                ]
            }]
        });

        let response = self.generate_content(&self.settings.fast_model, body).await?;
        response_text(&response)
    }

    async fn generate_image(&self, prompt: &str, aspect_ratio: AspectRatio) -> AiResult<Vec<u8>> {
        let body = json!({
            "instances": [{ "prompt": prompt }],
            "parameters": {
                "sampleCount": 1,
                "aspectRatio": aspect_ratio.as_str(),
                "outputMimeType": "image/jpeg"
            }
        });

        let response = self.post(&self.settings.image_model, "predict", &body).await?;
        let data = response["predictions"][0]["bytesBase64Encoded"]
            .as_str()
            .ok_or_else(|| AiError::InvalidResponse("Missing generated image".to_string()))?;
        Ok(audio::decode_base64(data)?)
    }

    async fn synthesize_speech(&self, text: &str) -> AiResult<Vec<u8>> {
        let mut body = text_request(text);
        body["generationConfig"] = json!({
            "responseModalities": ["AUDIO"],
            "speechConfig": {
                "voiceConfig": { "prebuiltVoiceConfig": { "voiceName": self.settings.voice } }
            }
        });

        let response = self
            .generate_content(&self.settings.speech_model, body)
            .await?;
        inline_data(&response)
    }

    async fn open_live_session(&self) -> AiResult<LiveSession> {
        let api_key = self.api_key()?;
        let url = format!(
            "{}{}?key={}",
            self.settings.live_url.trim_end_matches('/'),
            LIVE_PATH,
            api_key
        );

        let (ws_stream, _response) = tokio_tungstenite::connect_async(url.as_str()).await?;
        let (mut sink, mut stream) = ws_stream.split();

        let setup = live::setup_message(&self.settings.live_model);
        sink.send(Message::Text(setup.to_string())).await?;
        tracing::info!(model = %self.settings.live_model, "Live session connected");

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (command_tx, mut command_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    command = command_rx.recv() => match command {
                        Some(LiveCommand::Audio(pcm)) => {
                            let frame = live::audio_message(&pcm).to_string();
                            if let Err(e) = sink.send(Message::Text(frame)).await {
                                let _ = event_tx.send(LiveEvent::Error(e.to_string()));
                                break;
                            }
                        }
                        Some(LiveCommand::Close) | None => {
                            let _ = sink.send(Message::Close(None)).await;
                            break;
                        }
                    },
                    frame = stream.next() => {
                        let raw = match frame {
                            Some(Ok(Message::Text(text))) => text,
                            Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes) {
                                Ok(text) => text,
                                Err(_) => continue,
                            },
                            Some(Ok(Message::Close(frame))) => {
                                tracing::info!(?frame, "Live session closed by server");
                                break;
                            }
                            Some(Ok(_)) => continue,
                            Some(Err(e)) => {
                                tracing::error!(error = %e, "Live session receive error");
                                let _ = event_tx.send(LiveEvent::Error(e.to_string()));
                                break;
                            }
                            None => break,
                        };

                        match live::parse_server_message(&raw) {
                            Ok(events) => {
                                for event in events {
                                    let _ = event_tx.send(event);
                                }
                            }
                            Err(e) => tracing::warn!(error = %e, "Ignoring unreadable live frame"),
                        }
                    }
                }
            }
            let _ = event_tx.send(LiveEvent::Closed);
        });

        Ok(LiveSession::from_channels(event_rx, command_tx, Some(task)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_skips_thoughts() {
        let response = json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "pondering", "thought": true },
                    { "text": "Hello " },
                    { "text": "there" }
                ]}
            }]
        });
        assert_eq!(response_text(&response).unwrap(), "Hello there");
    }

    #[test]
    fn test_response_text_missing_content() {
        let err = response_text(&json!({ "candidates": [] })).unwrap_err();
        assert!(matches!(err, AiError::InvalidResponse(_)));
    }

    #[test]
    fn test_grounding_sources_skip_non_web_chunks() {
        let response = json!({
            "candidates": [{
                "groundingMetadata": { "groundingChunks": [
                    { "web": { "uri": "https://example.com/a", "title": "A" } },
                    { "retrievedContext": {} }
                ]}
            }]
        });
        assert_eq!(
            grounding_sources(&response),
            vec![GroundingSource {
                uri: "https://example.com/a".into(),
                title: "A".into()
            }]
        );
    }

    #[test]
    fn test_api_error_message_extraction() {
        let body = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(api_error_message(body), "Quota exceeded");
        assert_eq!(api_error_message("bad gateway"), "bad gateway");
    }

    #[tokio::test]
    async fn test_unconfigured_client_short_circuits() {
        let client = GeminiClient::new(AiSettings::default(), Some("  ".to_string())).unwrap();
        assert!(!client.is_configured());

        let err = client.generate_text("hi", QualityTier::Fast).await.unwrap_err();
        assert!(matches!(err, AiError::NotConfigured));
        assert!(matches!(
            client.open_live_session().await,
            Err(AiError::NotConfigured)
        ));
    }
}
