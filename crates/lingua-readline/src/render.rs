//! Terminal rendering of tutor state.

use colored::Colorize;
use lingua_application::TutorState;
use lingua_core::chat::{ChatMessage, MessageRole};
use lingua_core::lesson::{self, LessonContent};
use lingua_core::notice::Notice;
use lingua_core::quiz::{AnswerOutcome, QUIZ_TOPICS, QuizPhase, QuizResult, QuizSession};
use lingua_core::vocab::{CardImage, VocabCard};
use lingua_core::{LinguaError, Screen};
use std::path::Path;

const OPTION_LABELS: &[char] = &['A', 'B', 'C', 'D', 'E', 'F'];

pub fn banner() {
    println!("{}", "=== Lingua: AI English Tutor ===".bright_magenta().bold());
    println!(
        "{}",
        "Type '/help' for commands, or 'quit' to exit.".bright_black()
    );
    println!();
}

pub fn help() {
    let rows = [
        ("/home", "Bosh sahifa"),
        ("/lessons", "Lesson catalog"),
        ("/lesson <id>", "Open a lesson"),
        ("/back", "Back to the catalog"),
        ("/chat", "Chat with the tutor; plain text is sent as a message"),
        ("/vocab [word]", "Flashcards; plain text looks a word up"),
        ("/speak", "Pronounce the current flashcard"),
        ("/quiz", "Quiz start screen"),
        ("/topic <name>", "Choose the quiz topic"),
        ("/start", "Generate a new quiz"),
        ("/answer <n>", "Answer the current question (1-4 or a-d)"),
        ("/status", "Active screen and pending requests"),
        ("quit", "Exit"),
    ];
    for (command, description) in rows {
        println!("  {} {}", format!("{command:<16}").bright_cyan(), description);
    }
}

pub fn error(err: &LinguaError) {
    if err.is_busy() || err.is_empty_input() {
        println!("{}", err.to_string().yellow());
    } else {
        eprintln!("{}", format!("Error: {err}").red());
    }
}

pub fn usage(message: &str) {
    println!("{}", message.yellow());
}

pub fn notices(notices: &[Notice]) {
    for notice in notices {
        println!("{}", format!("! {}", notice.text).bright_yellow());
    }
}

pub fn discarded(what: &str) {
    println!(
        "{}",
        format!("({what} arrived after you left the screen and was dropped)").bright_black()
    );
}

/// Renders whatever the active screen shows.
pub fn screen(state: &TutorState) {
    let screen = state.screen();
    println!("{}", format!("--- {} ---", screen.title()).bright_magenta().bold());
    match screen {
        Screen::Home => home(),
        Screen::Lessons => match (state.lessons().open_topic(), state.lessons().content()) {
            (Some(_), Some(content)) => lesson_body(content),
            (Some(topic), None) => println!("{}", format!("Loading '{}'...", topic.title).bright_black()),
            (None, _) => catalog(),
        },
        Screen::Chat => {
            for message in state.conversation().messages() {
                chat_message(message);
            }
        }
        Screen::Vocabulary => match state.card() {
            Some(card) => vocab_card(card),
            None => println!("{}", "Type a word to build a flashcard.".bright_black()),
        },
        Screen::Quiz => quiz(state.quiz()),
    }
}

fn home() {
    println!("Salom! Ingliz tilini o'rganishni davom ettiramiz.");
    for (screen, command) in [
        (Screen::Lessons, "/lessons"),
        (Screen::Chat, "/chat"),
        (Screen::Vocabulary, "/vocab"),
        (Screen::Quiz, "/quiz"),
    ] {
        println!("  {} {}", format!("{command:<10}").bright_cyan(), screen.title());
    }
}

pub fn catalog() {
    for topic in lesson::catalog() {
        println!(
            "  [{}] {} {}",
            topic.id.bright_cyan(),
            topic.title.bold(),
            format!("({})", topic.level).bright_black()
        );
        println!("      {}", topic.description);
    }
    println!("{}", "Type a lesson id to open it.".bright_black());
}

pub fn lesson_body(content: &LessonContent) {
    for line in content.markdown.lines() {
        if line.starts_with('#') {
            println!("{}", line.bright_magenta().bold());
        } else {
            println!("{line}");
        }
    }
    println!("{}", "/back returns to the catalog.".bright_black());
}

pub fn chat_message(message: &ChatMessage) {
    match message.role {
        MessageRole::User => println!("{}", format!("> {}", message.text).green()),
        MessageRole::Assistant => {
            for line in message.text.lines() {
                println!("{}", line.bright_blue());
            }
        }
    }
}

pub fn vocab_card(card: &VocabCard) {
    println!("{}", card.word.bold().bright_white());
    println!("  {} {}", "Tarjima:".bright_black(), card.definition);
    println!("  {} {}", "Misol:".bright_black(), card.example.italic());
    match &card.image {
        CardImage::Generated(image) => println!(
            "  {} generated {} ({} base64 chars)",
            "Rasm:".bright_black(),
            image.mime_type,
            image.data_base64.len()
        ),
        CardImage::Placeholder { url } => {
            println!("  {} {} {}", "Rasm:".bright_black(), url, "(placeholder)".bright_black())
        }
    }
    println!("{}", "/speak plays the pronunciation.".bright_black());
}

pub fn played(word: &str, location: Option<&Path>) {
    match location {
        Some(path) => println!("{}", format!("Played '{word}' ({})", path.display()).green()),
        None => println!("{}", format!("Played '{word}'").green()),
    }
}

pub fn quiz(quiz: &QuizSession) {
    match quiz.phase() {
        QuizPhase::Idle => quiz_start(quiz),
        QuizPhase::Loading => println!("{}", "Generating questions...".bright_black()),
        QuizPhase::InProgress { .. } => question(quiz),
        QuizPhase::Completed => match quiz.result() {
            Some(result) => quiz_result(&result),
            None => quiz_start(quiz),
        },
    }
}

fn quiz_start(quiz: &QuizSession) {
    println!("Topic: {}", quiz.topic().bold());
    println!("{}", format!("Topics: {}", QUIZ_TOPICS.join(", ")).bright_black());
    println!("{}", "/topic <name> to change, /start to begin.".bright_black());
}

pub fn question(quiz: &QuizSession) {
    let Some((index, question)) = quiz.current_question() else {
        return;
    };
    println!(
        "{}",
        format!("Question {}/{}", index + 1, quiz.questions().len()).bright_black()
    );
    println!("{}", question.question.bold());
    for (i, option) in question.options.iter().enumerate() {
        let label = OPTION_LABELS.get(i).copied().unwrap_or('?');
        println!("  {} {}", format!("{label})").bright_cyan(), option);
    }
}

pub fn answer_outcome(outcome: &AnswerOutcome, options: &[String]) {
    if outcome.correct {
        println!("{}", "To'g'ri!".green().bold());
    } else {
        let label = OPTION_LABELS.get(outcome.correct_answer).copied().unwrap_or('?');
        let answer = options
            .get(outcome.correct_answer)
            .map(String::as_str)
            .unwrap_or_default();
        println!(
            "{} {}",
            "Noto'g'ri.".red().bold(),
            format!("Correct: {label}) {answer}").green()
        );
    }
    println!("{}", outcome.explanation.italic());
}

pub fn quiz_result(result: &QuizResult) {
    println!(
        "{}",
        format!("Natija: {} / {}", result.score, result.total).bold()
    );
    println!("{}", result.verdict.text().bright_magenta());
    println!("{}", "/start for a new quiz.".bright_black());
}

pub fn status(state: &TutorState) {
    println!("Screen: {}", state.screen().title().bold());
    let busy = state.busy_features();
    if busy.is_empty() {
        println!("Pending: {}", "none".bright_black());
    } else {
        let names: Vec<String> = busy.iter().map(ToString::to_string).collect();
        println!("Pending: {}", names.join(", ").yellow());
    }
    println!("Quiz topic: {}", state.quiz().topic());
}
