use serde::{Deserialize, Serialize};

/// Topic preselected on the quiz start screen.
pub const DEFAULT_TOPIC: &str = "General Grammar";

/// Topics offered on the quiz start screen. Free-text topics are accepted too.
pub const QUIZ_TOPICS: &[&str] = &[DEFAULT_TOPIC, "Verbs", "Prepositions", "Idioms"];

/// One multiple-choice question as generated upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`.
    pub correct_answer: usize,
    /// Why the answer is correct, in Uzbek.
    pub explanation: String,
}

impl QuizQuestion {
    /// A question can be played if it offers a real choice and its answer
    /// index points at one of the options.
    pub fn is_playable(&self) -> bool {
        self.options.len() >= 2 && self.correct_answer < self.options.len()
    }

    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_answer
    }
}
