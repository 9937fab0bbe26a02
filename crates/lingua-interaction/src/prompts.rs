//! Prompt templates sent to the generative service.

use lingua_core::lesson::LessonLevel;

/// System instruction for the chat tutor.
pub const TUTOR_SYSTEM_INSTRUCTION: &str = "You are a friendly and professional English language tutor for an Uzbek speaker. \
Your goal is to help the user practice English conversation. \
Correct their grammar mistakes gently at the end of your response. \
Explain difficult concepts in Uzbek if asked. \
Keep responses concise and encouraging.";

pub fn lesson_prompt(title: &str, level: LessonLevel) -> String {
    format!(
        "Create a structured English lesson about \"{title}\" for a {level} level student.\n\
         The lesson should be in Markdown format.\n\
         Include:\n\
         1. Introduction (in Uzbek and English)\n\
         2. Key Rules/Grammar\n\
         3. Examples\n\
         4. Common Mistakes\n\
         5. Summary.\n\
         Keep the tone educational."
    )
}

pub fn quiz_prompt(topic: &str, count: usize) -> String {
    format!(
        "Generate {count} multiple-choice questions about English grammar/vocabulary related to: \"{topic}\".\n\
         Each question must have exactly 4 options.\n\
         Return ONLY valid JSON."
    )
}

pub fn definition_prompt(word: &str) -> String {
    format!(
        "Define the English word \"{word}\". Provide: 1. Definition (Uzbek translation). \
         2. A simple English example sentence. Return JSON."
    )
}

pub fn illustration_prompt(word: &str) -> String {
    format!("A clear, cartoon-style educational illustration representing the word: \"{word}\"")
}
