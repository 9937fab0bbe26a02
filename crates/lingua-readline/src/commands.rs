//! Parsing of REPL input lines.

use lingua_core::Screen;

/// Slash commands and the argument each one takes (empty if none).
pub const COMMANDS: &[(&str, &str)] = &[
    ("/home", ""),
    ("/lessons", ""),
    ("/lesson", "<id>"),
    ("/back", ""),
    ("/chat", ""),
    ("/vocab", "[word]"),
    ("/speak", ""),
    ("/quiz", ""),
    ("/topic", "<name>"),
    ("/start", ""),
    ("/answer", "<1-4|a-d>"),
    ("/status", ""),
    ("/help", ""),
    ("/quit", ""),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Go(Screen),
    OpenLesson(String),
    Back,
    Lookup(String),
    Speak,
    Topic(String),
    StartQuiz,
    /// Zero-based option index.
    Answer(usize),
    Status,
    Help,
    Quit,
    /// Plain input, routed by the active screen.
    Text(String),
    Invalid(String),
}

/// Parses one input line. `None` for blank lines.
pub fn parse(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if line == "quit" || line == "exit" {
        return Some(Command::Quit);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Some(Command::Text(line.to_string()));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    let command = match name {
        "home" => Command::Go(Screen::Home),
        "lessons" => Command::Go(Screen::Lessons),
        "chat" => Command::Go(Screen::Chat),
        "quiz" => Command::Go(Screen::Quiz),
        "vocab" if arg.is_empty() => Command::Go(Screen::Vocabulary),
        "vocab" => Command::Lookup(arg.to_string()),
        "lesson" if arg.is_empty() => Command::Invalid("usage: /lesson <id>".to_string()),
        "lesson" => Command::OpenLesson(arg.to_string()),
        "back" => Command::Back,
        "speak" => Command::Speak,
        "topic" if arg.is_empty() => Command::Invalid("usage: /topic <name>".to_string()),
        "topic" => Command::Topic(arg.to_string()),
        "start" => Command::StartQuiz,
        "answer" => match parse_option(arg) {
            Some(index) => Command::Answer(index),
            None => Command::Invalid("usage: /answer <1-4 | a-d>".to_string()),
        },
        "status" => Command::Status,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => Command::Invalid(format!("unknown command: /{other}")),
    };
    Some(command)
}

/// Reads an option given as `1`.. or `a`.. and returns its zero-based index.
pub fn parse_option(text: &str) -> Option<usize> {
    let text = text.trim();
    if let Ok(number) = text.parse::<usize>() {
        return number.checked_sub(1);
    }
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) if letter.is_ascii_alphabetic() => {
            Some((letter.to_ascii_lowercase() as u8 - b'a') as usize)
        }
        _ => None,
    }
}
