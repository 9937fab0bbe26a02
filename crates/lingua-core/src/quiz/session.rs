//! Quiz screen state machine.
//!
//! ```text
//! Idle --begin_loading--> Loading --load(non-empty)--> InProgress{0, None}
//!                            |                              |
//!                            +--load(empty)/fail--> Idle    select(i)
//!                                                           v
//!                         InProgress{n+1, None} <--advance-- InProgress{n, Some(i)}
//!                                                           |
//!                                         advance(last) --> Completed
//! ```

use super::model::{DEFAULT_TOPIC, QuizQuestion};
use crate::error::{LinguaError, Result};
use crate::texts::{VERDICT_GOOD, VERDICT_NEEDS_PRACTICE, VERDICT_PERFECT};

/// Where the quiz screen currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// Start screen: topic picker and start button.
    Idle,
    /// Questions are being generated.
    Loading,
    /// Question `index` is shown; `selected` is set once it was answered.
    InProgress {
        index: usize,
        selected: Option<usize>,
    },
    /// Results screen.
    Completed,
}

/// Feedback for a selected answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    /// Quiz the answer belongs to; pass it back to [`QuizSession::advance`].
    pub generation: u64,
    pub index: usize,
    pub selected: usize,
    pub correct: bool,
    pub correct_answer: usize,
    pub explanation: String,
    /// `true` if this was the last question.
    pub is_last: bool,
}

/// Overall assessment on the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Perfect,
    Good,
    NeedsPractice,
}

impl Verdict {
    fn for_score(score: usize, total: usize) -> Self {
        if score == total {
            Verdict::Perfect
        } else if score * 2 > total {
            Verdict::Good
        } else {
            Verdict::NeedsPractice
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Verdict::Perfect => VERDICT_PERFECT,
            Verdict::Good => VERDICT_GOOD,
            Verdict::NeedsPractice => VERDICT_NEEDS_PRACTICE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizResult {
    pub score: usize,
    pub total: usize,
    pub verdict: Verdict,
}

/// The quiz screen: topic, generated questions, progress and score.
#[derive(Debug, Clone)]
pub struct QuizSession {
    topic: String,
    questions: Vec<QuizQuestion>,
    phase: QuizPhase,
    score: usize,
    /// Bumped by every `begin_loading`.
    generation: u64,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            topic: DEFAULT_TOPIC.to_string(),
            questions: Vec::new(),
            phase: QuizPhase::Idle,
            score: 0,
            generation: 0,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    /// The question on screen, if a quiz is in progress.
    pub fn current_question(&self) -> Option<(usize, &QuizQuestion)> {
        match self.phase {
            QuizPhase::InProgress { index, .. } => {
                self.questions.get(index).map(|question| (index, question))
            }
            _ => None,
        }
    }

    /// Changes the topic used by the next start. Only allowed on the start
    /// screen.
    pub fn select_topic(&mut self, topic: impl Into<String>) -> Result<()> {
        let topic = topic.into();
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(LinguaError::invalid_state("quiz topic must not be empty"));
        }
        if !matches!(self.phase, QuizPhase::Idle | QuizPhase::Completed) {
            return Err(LinguaError::invalid_state(
                "quiz topic can only be changed before a quiz starts",
            ));
        }
        self.topic = topic.to_string();
        Ok(())
    }

    /// Resets progress and enters `Loading`.
    pub fn begin_loading(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.questions.clear();
        self.score = 0;
        self.phase = QuizPhase::Loading;
    }

    /// Installs freshly generated questions.
    ///
    /// Unplayable questions are dropped. Returns the number of questions kept;
    /// zero puts the screen back on the start screen.
    pub fn load(&mut self, questions: Vec<QuizQuestion>) -> usize {
        self.questions = questions
            .into_iter()
            .filter(QuizQuestion::is_playable)
            .collect();
        self.score = 0;
        self.phase = if self.questions.is_empty() {
            QuizPhase::Idle
        } else {
            QuizPhase::InProgress {
                index: 0,
                selected: None,
            }
        };
        self.questions.len()
    }

    /// Abandons a pending load and returns to the start screen.
    pub fn reset(&mut self) {
        self.questions.clear();
        self.score = 0;
        self.phase = QuizPhase::Idle;
    }

    /// Records the learner's answer for the current question.
    ///
    /// The first answer locks the question; the score increases iff it is the
    /// correct one.
    pub fn select(&mut self, option: usize) -> Result<AnswerOutcome> {
        let QuizPhase::InProgress { index, selected } = self.phase else {
            return Err(LinguaError::invalid_state("no question is being asked"));
        };
        if selected.is_some() {
            return Err(LinguaError::invalid_state(
                "this question has already been answered",
            ));
        }

        let question = &self.questions[index];
        if option >= question.options.len() {
            return Err(LinguaError::invalid_state(format!(
                "option {} does not exist (question has {} options)",
                option + 1,
                question.options.len()
            )));
        }

        let correct = question.is_correct(option);
        let outcome = AnswerOutcome {
            generation: self.generation,
            index,
            selected: option,
            correct,
            correct_answer: question.correct_answer,
            explanation: question.explanation.clone(),
            is_last: index + 1 == self.questions.len(),
        };

        if correct {
            self.score += 1;
        }
        self.phase = QuizPhase::InProgress {
            index,
            selected: Some(option),
        };
        Ok(outcome)
    }

    /// Moves past the answered question `from_index` of quiz `generation`.
    ///
    /// Returns `false` if that is not the current, answered question. A
    /// duplicate advance, or one left over from a restarted quiz, does nothing.
    pub fn advance(&mut self, generation: u64, from_index: usize) -> bool {
        if generation != self.generation {
            return false;
        }
        match self.phase {
            QuizPhase::InProgress {
                index,
                selected: Some(_),
            } if index == from_index => {
                self.phase = if index + 1 < self.questions.len() {
                    QuizPhase::InProgress {
                        index: index + 1,
                        selected: None,
                    }
                } else {
                    QuizPhase::Completed
                };
                true
            }
            _ => false,
        }
    }

    /// Final score, available once the quiz is completed.
    pub fn result(&self) -> Option<QuizResult> {
        if self.phase != QuizPhase::Completed {
            return None;
        }
        let total = self.questions.len();
        Some(QuizResult {
            score: self.score,
            total,
            verdict: Verdict::for_score(self.score, total),
        })
    }
}
