//! Static user-facing texts.
//!
//! The tutor targets Uzbek speakers, so fallback and status messages are in
//! Uzbek. Nothing here is generated.

/// First assistant message of every conversation.
pub const CHAT_GREETING: &str = "Hello! I am your AI English tutor. How can I help you today?";

/// Appended to the conversation when the chat call fails.
pub const CHAT_FAILED: &str = "Xatolik yuz berdi. Internetni tekshiring.";

/// Appended when the service answered but returned no text.
pub const CHAT_EMPTY_REPLY: &str = "Kechirasiz, hozir javob bera olmayman.";

/// Shown in place of the lesson body when lesson generation fails.
pub const LESSON_FAILED: &str =
    "Darsni yuklashda xatolik yuz berdi. Iltimos qayta urinib ko'ring.";

/// Card definition used when the service omits one.
pub const DEFINITION_MISSING: &str = "Topilmadi";

/// Card example used when the service omits one.
pub const EXAMPLE_MISSING: &str = "Misol mavjud emas";

/// Notice raised when a vocabulary lookup fails.
pub const VOCAB_FAILED: &str = "So'zni topishda xatolik.";

/// Notice raised when no playable quiz could be generated.
pub const QUIZ_FAILED: &str = "Test tuzishda xatolik.";

/// Notice raised when pronunciation audio could not be produced or played.
pub const SPEECH_FAILED: &str = "Talaffuzni yuklab bo'lmadi.";

/// Quiz verdicts shown on the results screen.
pub const VERDICT_PERFECT: &str = "Mukammal!";
pub const VERDICT_GOOD: &str = "Yaxshi natija!";
pub const VERDICT_NEEDS_PRACTICE: &str = "Ko'proq shug'ullanish kerak.";
