//! Quiz domain module.
//!
//! - `model`: generated question records (`QuizQuestion`)
//! - `session`: the quiz screen state machine (`QuizSession`)

mod model;
mod session;

pub use model::{DEFAULT_TOPIC, QUIZ_TOPICS, QuizQuestion};
pub use session::{AnswerOutcome, QuizPhase, QuizResult, QuizSession, Verdict};
