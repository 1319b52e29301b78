//! Live voice conversation
//!
//! A [`LiveSession`] is a handle over a background connection task. Audio
//! goes out through [`LiveSession::send_audio`]; transcripts and synthesized
//! audio come back as [`LiveEvent`]s. [`TranscriptAccumulator`] folds the
//! incremental transcript fragments into complete [`Turn`]s.

use crate::audio;
use crate::{AiError, AiResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Something the live backend reported
#[derive(Debug, Clone, PartialEq)]
pub enum LiveEvent {
    /// Fragment of what the user said
    InputTranscript(String),
    /// Fragment of what the model said
    OutputTranscript(String),
    /// 24 kHz 16-bit LE mono PCM from the model
    Audio(Vec<u8>),
    TurnComplete,
    Error(String),
    Closed,
}

/// Instruction for the connection task
#[derive(Debug, Clone, PartialEq)]
pub enum LiveCommand {
    /// 16 kHz 16-bit LE mono PCM from the microphone
    Audio(Vec<u8>),
    Close,
}

/// One finished exchange
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub user: String,
    pub model: String,
}

/// Collects transcript fragments until the backend marks the turn complete
#[derive(Debug, Default)]
pub struct TranscriptAccumulator {
    user: String,
    model: String,
    turns: Vec<Turn>,
}

impl TranscriptAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed an event, returning the turn it completed if any
    pub fn push(&mut self, event: &LiveEvent) -> Option<&Turn> {
        match event {
            LiveEvent::InputTranscript(text) => self.user.push_str(text),
            LiveEvent::OutputTranscript(text) => self.model.push_str(text),
            LiveEvent::TurnComplete => {
                self.turns.push(Turn {
                    user: std::mem::take(&mut self.user),
                    model: std::mem::take(&mut self.model),
                });
                return self.turns.last();
            }
            _ => {}
        }
        None
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Text heard so far in the unfinished turn
    pub fn pending(&self) -> (&str, &str) {
        (&self.user, &self.model)
    }
}

/// Handle to an open live conversation
pub struct LiveSession {
    events: mpsc::UnboundedReceiver<LiveEvent>,
    commands: mpsc::UnboundedSender<LiveCommand>,
    task: Option<JoinHandle<()>>,
}

impl LiveSession {
    /// Wrap channels driven by some connection task
    pub fn from_channels(
        events: mpsc::UnboundedReceiver<LiveEvent>,
        commands: mpsc::UnboundedSender<LiveCommand>,
        task: Option<JoinHandle<()>>,
    ) -> Self {
        Self {
            events,
            commands,
            task,
        }
    }

    /// Next event, or `None` once the connection task has finished
    pub async fn next_event(&mut self) -> Option<LiveEvent> {
        self.events.recv().await
    }

    pub fn send_audio(&self, pcm: &[u8]) -> AiResult<()> {
        self.commands
            .send(LiveCommand::Audio(pcm.to_vec()))
            .map_err(|_| AiError::Session("session is closed".to_string()))
    }

    /// End the session and wait for the connection task to stop
    pub async fn close(mut self) {
        // The task may already be gone; nothing to report then
        let _ = self.commands.send(LiveCommand::Close);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Live session task ended abnormally");
            }
        }
    }
}

impl Drop for LiveSession {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Setup frame opening a BidiGenerateContent stream
pub(crate) fn setup_message(model: &str) -> Value {
    serde_json::json!({
        "setup": {
            "model": format!("models/{model}"),
            "generationConfig": { "responseModalities": ["AUDIO"] },
            "inputAudioTranscription": {},
            "outputAudioTranscription": {}
        }
    })
}

/// Frame carrying one chunk of microphone audio
pub(crate) fn audio_message(pcm: &[u8]) -> Value {
    serde_json::json!({
        "realtimeInput": {
            "mediaChunks": [{
                "mimeType": audio::input_mime_type(),
                "data": audio::encode_base64(pcm)
            }]
        }
    })
}

/// Translate one server frame into events, in the order they should apply
pub fn parse_server_message(raw: &str) -> AiResult<Vec<LiveEvent>> {
    let message: Value = serde_json::from_str(raw)
        .map_err(|e| AiError::InvalidResponse(format!("live frame is not JSON: {e}")))?;

    let mut events = Vec::new();

    if let Some(error) = message.get("error") {
        let text = error["message"].as_str().unwrap_or("unknown live error");
        events.push(LiveEvent::Error(text.to_string()));
        return Ok(events);
    }

    let content = &message["serverContent"];
    if content.is_null() {
        return Ok(events);
    }

    if let Some(text) = content["inputTranscription"]["text"].as_str() {
        events.push(LiveEvent::InputTranscript(text.to_string()));
    }
    if let Some(text) = content["outputTranscription"]["text"].as_str() {
        events.push(LiveEvent::OutputTranscript(text.to_string()));
    }

    let audio_parts = content["modelTurn"]["parts"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|part| part["inlineData"]["data"].as_str());
    for data in audio_parts {
        events.push(LiveEvent::Audio(audio::decode_base64(data)?));
    }

    if content["turnComplete"].as_bool().unwrap_or(false) {
        events.push(LiveEvent::TurnComplete);
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_until_turn_complete() {
        let mut acc = TranscriptAccumulator::new();
        assert!(acc.push(&LiveEvent::InputTranscript("Who is ".into())).is_none());
        acc.push(&LiveEvent::InputTranscript("Kael?".into()));
        acc.push(&LiveEvent::Audio(vec![0, 0]));
        acc.push(&LiveEvent::OutputTranscript("A detective.".into()));

        let turn = acc.push(&LiveEvent::TurnComplete).cloned().unwrap();
        assert_eq!(
            turn,
            Turn {
                user: "Who is Kael?".into(),
                model: "A detective.".into()
            }
        );
        assert_eq!(acc.pending(), ("", ""));
        assert_eq!(acc.turns().len(), 1);
    }

    #[test]
    fn test_parse_transcripts_and_turn_complete() {
        let raw = r#"{"serverContent":{"inputTranscription":{"text":"hi"},"outputTranscription":{"text":"hello"},"turnComplete":true}}"#;
        let events = parse_server_message(raw).unwrap();

        assert_eq!(
            events,
            vec![
                LiveEvent::InputTranscript("hi".into()),
                LiveEvent::OutputTranscript("hello".into()),
                LiveEvent::TurnComplete,
            ]
        );
    }

    #[test]
    fn test_parse_audio_chunk() {
        let data = audio::encode_base64(&[1, 2, 3, 4]);
        let raw = format!(
            r#"{{"serverContent":{{"modelTurn":{{"parts":[{{"inlineData":{{"mimeType":"audio/pcm;rate=24000","data":"{data}"}}}}]}}}}}}"#
        );

        assert_eq!(
            parse_server_message(&raw).unwrap(),
            vec![LiveEvent::Audio(vec![1, 2, 3, 4])]
        );
    }

    #[test]
    fn test_setup_complete_has_no_events() {
        assert!(parse_server_message(r#"{"setupComplete":{}}"#).unwrap().is_empty());
        assert!(parse_server_message("not json").is_err());
    }

    #[test]
    fn test_audio_frame_shape() {
        let frame = audio_message(&[0, 1]);
        assert_eq!(
            frame["realtimeInput"]["mediaChunks"][0]["mimeType"],
            "audio/pcm;rate=16000"
        );
        assert_eq!(setup_message("m")["setup"]["model"], "models/m");
    }

    #[tokio::test]
    async fn test_session_send_after_close_fails() {
        let (_event_tx, event_rx) = mpsc::unbounded_channel();
        let (command_tx, mut command_rx) = mpsc::unbounded_channel();
        let session = LiveSession::from_channels(event_rx, command_tx, None);

        session.send_audio(&[1, 2]).unwrap();
        assert_eq!(command_rx.recv().await, Some(LiveCommand::Audio(vec![1, 2])));

        drop(command_rx);
        assert!(matches!(session.send_audio(&[3]), Err(AiError::Session(_))));
        session.close().await;
    }
}
