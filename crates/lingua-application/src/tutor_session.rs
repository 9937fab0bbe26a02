//! View/state controller of the tutor.
//!
//! `TutorSession` owns all screen state behind one async mutex. Request
//! operations follow the same shape:
//!
//! 1. validate input (empty input never reaches the service)
//! 2. lock, switch to the feature's screen, take a ticket (busy guard),
//!    prepare the loading state, unlock
//! 3. call the service without holding the lock
//! 4. lock, finish the ticket, apply the response only if it is still current
//!
//! The lock is never held across an outbound call, so other screens stay
//! responsive while a request is pending.

use crate::generation_client::GenerationClient;
use lingua_core::chat::{ChatMessage, Conversation};
use lingua_core::lesson::{self, LessonContent, LessonView};
use lingua_core::notice::Notice;
use lingua_core::quiz::{AnswerOutcome, QuizPhase, QuizSession};
use lingua_core::speech::AudioPlayer;
use lingua_core::texts::{QUIZ_FAILED, SPEECH_FAILED, VOCAB_FAILED};
use lingua_core::vocab::{VocabCard, VocabView};
use lingua_core::{
    Delivery, Feature, LinguaError, RequestTracker, Result, Screen, TicketState,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Everything the UI renders.
#[derive(Debug, Clone, Default)]
pub struct TutorState {
    tracker: RequestTracker,
    conversation: Conversation,
    lessons: LessonView,
    vocab: VocabView,
    quiz: QuizSession,
    notices: Vec<Notice>,
}

impl TutorState {
    pub fn screen(&self) -> Screen {
        self.tracker.screen()
    }

    pub fn is_busy(&self, feature: Feature) -> bool {
        self.tracker.is_busy(feature)
    }

    pub fn busy_features(&self) -> Vec<Feature> {
        self.tracker.busy_features()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn lessons(&self) -> &LessonView {
        &self.lessons
    }

    pub fn card(&self) -> Option<&VocabCard> {
        self.vocab.card()
    }

    pub fn quiz(&self) -> &QuizSession {
        &self.quiz
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    fn notify(&mut self, feature: Feature, text: &str) {
        self.notices.push(Notice::new(feature, text));
    }
}

pub struct TutorSession {
    client: GenerationClient,
    player: Arc<dyn AudioPlayer>,
    state: Mutex<TutorState>,
}

impl TutorSession {
    pub fn new(client: GenerationClient, player: Arc<dyn AudioPlayer>) -> Self {
        Self {
            client,
            player,
            state: Mutex::new(TutorState::default()),
        }
    }

    /// A copy of the current state for rendering.
    pub async fn snapshot(&self) -> TutorState {
        self.state.lock().await.clone()
    }

    /// Removes and returns pending notices.
    pub async fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.state.lock().await.notices)
    }

    pub async fn screen(&self) -> Screen {
        self.state.lock().await.screen()
    }

    /// Switches the active screen. Returns `true` if it changed.
    pub async fn navigate(&self, screen: Screen) -> bool {
        let changed = self.state.lock().await.tracker.navigate(screen);
        if changed {
            debug!(%screen, "Navigated");
        }
        changed
    }

    // ============================================================================
    // Chat
    // ============================================================================

    /// Appends `text` as a user message and asks the tutor for a reply.
    ///
    /// The reply (or the fallback text if the call failed) is appended as
    /// exactly one assistant message.
    pub async fn send_chat_message(&self, text: &str) -> Result<Delivery<ChatMessage>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(LinguaError::EmptyInput {
                feature: Feature::Chat,
            });
        }

        let (ticket, history) = {
            let mut state = self.state.lock().await;
            state.tracker.navigate(Screen::Chat);
            let ticket = state.tracker.begin(Feature::Chat)?;
            let history = state.conversation.history();
            state.conversation.push(ChatMessage::user(text));
            (ticket, history)
        };

        let reply = self.client.chat_reply(&history, text).await;

        let mut state = self.state.lock().await;
        match state.tracker.finish(&ticket) {
            TicketState::Current => {
                let message = state
                    .conversation
                    .push(ChatMessage::assistant(reply.value))
                    .clone();
                Ok(Delivery::Applied(message))
            }
            TicketState::Stale => {
                info!("Dropping chat reply, user left the chat screen");
                Ok(Delivery::Discarded)
            }
        }
    }

    // ============================================================================
    // Lessons
    // ============================================================================

    /// Opens the catalog topic `topic_id` and loads its body.
    pub async fn open_lesson(&self, topic_id: &str) -> Result<Delivery<LessonContent>> {
        let topic = lesson::find_topic(topic_id)
            .ok_or_else(|| LinguaError::not_found("lesson", topic_id))?;

        let ticket = {
            let mut state = self.state.lock().await;
            state.tracker.navigate(Screen::Lessons);
            let ticket = state.tracker.begin(Feature::Lesson)?;
            state.lessons.open(topic);
            ticket
        };

        let markdown = self.client.lesson(topic).await;
        let content = LessonContent {
            topic_id: topic.id.to_string(),
            markdown: markdown.value,
        };

        let mut state = self.state.lock().await;
        match state.tracker.finish(&ticket) {
            TicketState::Current => {
                // The learner may have closed or switched the lesson meanwhile.
                if state.lessons.fill(content.clone()) {
                    Ok(Delivery::Applied(content))
                } else {
                    Ok(Delivery::Discarded)
                }
            }
            TicketState::Stale => {
                info!(topic = topic.title, "Dropping lesson, user left the lessons screen");
                if state.lessons.open_topic().is_some_and(|open| open.id == topic.id)
                    && state.lessons.content().is_none()
                {
                    state.lessons.back();
                }
                Ok(Delivery::Discarded)
            }
        }
    }

    /// Returns to the lesson catalog.
    pub async fn close_lesson(&self) {
        self.state.lock().await.lessons.back();
    }

    // ============================================================================
    // Vocabulary
    // ============================================================================

    /// Builds a flashcard for `word`.
    ///
    /// Empty input performs no call and leaves the current card untouched.
    /// `Applied(None)` means the lookup failed and a notice was raised.
    pub async fn lookup_word(&self, word: &str) -> Result<Delivery<Option<VocabCard>>> {
        let word = word.trim();
        if word.is_empty() {
            return Err(LinguaError::EmptyInput {
                feature: Feature::Vocab,
            });
        }

        let ticket = {
            let mut state = self.state.lock().await;
            state.tracker.navigate(Screen::Vocabulary);
            let ticket = state.tracker.begin(Feature::Vocab)?;
            state.vocab.clear();
            ticket
        };

        let result = self.client.vocab_card(word).await;

        let mut state = self.state.lock().await;
        if state.tracker.finish(&ticket) == TicketState::Stale {
            info!(word, "Dropping vocab card, user left the vocabulary screen");
            return Ok(Delivery::Discarded);
        }
        match result {
            Ok(card) => {
                state.vocab.show(card.clone());
                Ok(Delivery::Applied(Some(card)))
            }
            Err(_) => {
                state.notify(Feature::Vocab, VOCAB_FAILED);
                Ok(Delivery::Applied(None))
            }
        }
    }

    /// Fetches and plays the pronunciation of the current card's word.
    ///
    /// The speech busy flag stays set until playback has finished.
    /// `Applied(None)` means no audio could be produced or played.
    pub async fn play_pronunciation(&self) -> Result<Delivery<Option<PathBuf>>> {
        let (ticket, word) = {
            let mut state = self.state.lock().await;
            let word = state
                .vocab
                .card()
                .map(|card| card.word.clone())
                .ok_or_else(|| LinguaError::invalid_state("no flashcard to pronounce"))?;
            state.tracker.navigate(Screen::Vocabulary);
            let ticket = state.tracker.begin(Feature::Speech)?;
            (ticket, word)
        };

        let clip = self.client.speech(&word).await;

        let clip = {
            let mut state = self.state.lock().await;
            if !state.tracker.is_current(&ticket) {
                state.tracker.finish(&ticket);
                info!(word = %word, "Dropping pronunciation, user left the vocabulary screen");
                return Ok(Delivery::Discarded);
            }
            match clip {
                Some(clip) => {
                    state.vocab.attach_audio(&word, clip.clone());
                    clip
                }
                None => {
                    state.tracker.finish(&ticket);
                    state.notify(Feature::Speech, SPEECH_FAILED);
                    return Ok(Delivery::Applied(None));
                }
            }
        };

        let played = self.player.play(&word, &clip).await;

        let mut state = self.state.lock().await;
        state.tracker.finish(&ticket);
        match played {
            Ok(location) => Ok(Delivery::Applied(location)),
            Err(err) => {
                warn!(error = %err, "Audio playback failed");
                state.notify(Feature::Speech, SPEECH_FAILED);
                Ok(Delivery::Applied(None))
            }
        }
    }

    // ============================================================================
    // Quiz
    // ============================================================================

    /// Chooses the topic for the next quiz.
    pub async fn select_quiz_topic(&self, topic: &str) -> Result<()> {
        self.state.lock().await.quiz.select_topic(topic)
    }

    /// Generates a new quiz for the selected topic.
    ///
    /// Returns the number of playable questions; zero means generation failed,
    /// the start screen is shown again and a notice was raised.
    pub async fn start_quiz(&self) -> Result<Delivery<usize>> {
        let (ticket, topic) = {
            let mut state = self.state.lock().await;
            state.tracker.navigate(Screen::Quiz);
            let ticket = state.tracker.begin(Feature::Quiz)?;
            state.quiz.begin_loading();
            (ticket, state.quiz.topic().to_string())
        };

        let fetched = self.client.quiz(&topic).await;

        let mut state = self.state.lock().await;
        if state.tracker.finish(&ticket) == TicketState::Stale {
            info!(topic = %topic, "Dropping quiz, user left the quiz screen");
            if state.quiz.phase() == QuizPhase::Loading {
                state.quiz.reset();
            }
            return Ok(Delivery::Discarded);
        }

        let count = state.quiz.load(fetched.value);
        if count == 0 {
            state.notify(Feature::Quiz, QUIZ_FAILED);
        }
        Ok(Delivery::Applied(count))
    }

    /// Answers the current question with option `option` (zero-based).
    pub async fn answer_quiz(&self, option: usize) -> Result<AnswerOutcome> {
        self.state.lock().await.quiz.select(option)
    }

    /// Moves past answered question `from_index` of quiz `generation` (both
    /// taken from the [`AnswerOutcome`]). Returns `false` if it is not the
    /// current answered question, e.g. because the quiz was restarted.
    pub async fn advance_quiz(&self, generation: u64, from_index: usize) -> bool {
        self.state.lock().await.quiz.advance(generation, from_index)
    }
}
