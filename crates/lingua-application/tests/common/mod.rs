#![allow(dead_code)]

use lingua_application::{GenerationClient, TutorSession};
use lingua_core::chat::HistoryTurn;
use lingua_core::generation::{EncodedAudio, GenerationService};
use lingua_core::lesson::LessonLevel;
use lingua_core::quiz::QuizQuestion;
use lingua_core::speech::{AudioClip, AudioPlayer};
use lingua_core::vocab::{GeneratedImage, WordDefinition};
use lingua_core::{Feature, LinguaError, Result};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;

/// Generation service double with canned answers.
///
/// With a gate installed, every call waits for a permit before answering, so
/// tests can act while a request is outstanding.
pub struct MockGenerationService {
    pub fail: bool,
    pub chat_reply: Option<String>,
    pub quiz: Vec<QuizQuestion>,
    pub definition: WordDefinition,
    pub image: Option<GeneratedImage>,
    pub image_fails: bool,
    pub audio: Option<EncodedAudio>,
    pub gate: Option<Arc<Semaphore>>,
    pub calls: AtomicUsize,
    pub chat_histories: Mutex<Vec<Vec<HistoryTurn>>>,
}

impl Default for MockGenerationService {
    fn default() -> Self {
        Self {
            fail: false,
            chat_reply: Some("Great job! Small note: say \"I went\".".to_string()),
            quiz: vec![question(1), question(0), question(3)],
            definition: WordDefinition {
                definition: Some("olma".to_string()),
                example: Some("I eat an apple every day.".to_string()),
            },
            image: Some(GeneratedImage {
                mime_type: "image/png".to_string(),
                data_base64: "iVBORw0KGgo=".to_string(),
            }),
            image_fails: false,
            audio: Some(EncodedAudio {
                mime_type: "audio/L16;codec=pcm;rate=24000".to_string(),
                // four bytes of PCM
                data_base64: "AQACAA==".to_string(),
            }),
            gate: None,
            calls: AtomicUsize::new(0),
            chat_histories: Mutex::new(Vec::new()),
        }
    }
}

impl MockGenerationService {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn gated(gate: Arc<Semaphore>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn enter(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }
        if self.fail {
            return Err(LinguaError::service(Some(503), "UNAVAILABLE: try later"));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl GenerationService for MockGenerationService {
    async fn send_chat(&self, history: &[HistoryTurn], _message: &str) -> Result<Option<String>> {
        self.chat_histories.lock().unwrap().push(history.to_vec());
        self.enter().await?;
        Ok(self.chat_reply.clone())
    }

    async fn generate_lesson(&self, title: &str, level: LessonLevel) -> Result<String> {
        self.enter().await?;
        Ok(format!("# {title}\n\nLevel: {level}"))
    }

    async fn generate_quiz(&self, _topic: &str, _count: usize) -> Result<Vec<QuizQuestion>> {
        self.enter().await?;
        Ok(self.quiz.clone())
    }

    async fn define_word(&self, _word: &str) -> Result<WordDefinition> {
        self.enter().await?;
        Ok(self.definition.clone())
    }

    async fn generate_image(&self, _word: &str) -> Result<Option<GeneratedImage>> {
        self.enter().await?;
        if self.image_fails {
            return Err(LinguaError::malformed("no candidates"));
        }
        Ok(self.image.clone())
    }

    async fn synthesize_speech(&self, _text: &str) -> Result<Option<EncodedAudio>> {
        self.enter().await?;
        Ok(self.audio.clone())
    }
}

/// Player double that records what it was asked to play.
#[derive(Default)]
pub struct RecordingPlayer {
    pub played: Mutex<Vec<(String, AudioClip)>>,
    pub fail: bool,
}

#[async_trait::async_trait]
impl AudioPlayer for RecordingPlayer {
    async fn play(&self, word: &str, clip: &AudioClip) -> Result<Option<PathBuf>> {
        if self.fail {
            return Err(LinguaError::io("no audio device"));
        }
        self.played
            .lock()
            .unwrap()
            .push((word.to_string(), clip.clone()));
        Ok(Some(PathBuf::from(format!("/tmp/{word}.wav"))))
    }
}

pub fn question(correct: usize) -> QuizQuestion {
    QuizQuestion {
        question: "Choose the correct form".to_string(),
        options: vec!["go".into(), "goes".into(), "went".into(), "gone".into()],
        correct_answer: correct,
        explanation: "Izoh".to_string(),
    }
}

pub fn session_with(
    service: Arc<MockGenerationService>,
    player: Arc<RecordingPlayer>,
) -> TutorSession {
    TutorSession::new(GenerationClient::new(service, 5), player)
}

pub fn session(service: MockGenerationService) -> (TutorSession, Arc<MockGenerationService>) {
    let service = Arc::new(service);
    let session = session_with(service.clone(), Arc::new(RecordingPlayer::default()));
    (session, service)
}

/// Waits until `feature` is busy on `session`.
pub async fn wait_until_busy(session: &TutorSession, feature: Feature) {
    for _ in 0..200 {
        if session.snapshot().await.is_busy(feature) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("{feature} never became busy");
}
