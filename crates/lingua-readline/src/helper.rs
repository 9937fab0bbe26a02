use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use lingua_core::lesson;
use lingua_core::quiz::QUIZ_TOPICS;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::commands::COMMANDS;

/// How the input line reads so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    /// A known slash command, with the argument it takes.
    Command { usage: &'static str },
    /// Starts with `/` but names no command (yet).
    Unknown,
    Quit,
    Text,
}

fn classify(line: &str) -> LineKind {
    let trimmed = line.trim();
    if trimmed == "quit" || trimmed == "exit" {
        return LineKind::Quit;
    }
    if !trimmed.starts_with('/') {
        return LineKind::Text;
    }
    let name = trimmed.split_whitespace().next().unwrap_or(trimmed);
    if name == "/quit" || name == "/exit" {
        return LineKind::Quit;
    }
    COMMANDS
        .iter()
        .find(|(command, _)| *command == name)
        .map_or(LineKind::Unknown, |&(_, usage)| LineKind::Command { usage })
}

/// Greyed-out continuation for `line`: the rest of a command name plus its
/// argument, or just the argument once the command is typed.
fn hint_for(line: &str) -> Option<String> {
    if !line.starts_with('/') {
        return None;
    }
    if let Some(name) = line.strip_suffix(' ') {
        if name.contains(' ') {
            return None;
        }
        return match classify(name) {
            LineKind::Command { usage } if !usage.is_empty() => Some(usage.to_string()),
            _ => None,
        };
    }
    if line.contains(' ') {
        return None;
    }
    COMMANDS
        .iter()
        .find(|(command, _)| command.starts_with(line) && command.len() > line.len())
        .map(|&(command, usage)| {
            let rest = &command[line.len()..];
            if usage.is_empty() {
                rest.to_string()
            } else {
                format!("{rest} {usage}")
            }
        })
}

fn pairs<'a>(values: impl Iterator<Item = &'a str>) -> Vec<Pair> {
    values
        .map(|value| Pair {
            display: value.to_string(),
            replacement: value.to_string(),
        })
        .collect()
}

/// rustyline helper: completes commands, quiz topics and lesson ids, hints
/// command arguments and colours the line by what it will do.
#[derive(Clone, Default)]
pub struct CliHelper;

impl CliHelper {
    pub fn new() -> Self {
        Self
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if let Some(partial) = line.strip_prefix("/topic ") {
            let partial = partial.to_lowercase();
            let topics = QUIZ_TOPICS
                .iter()
                .copied()
                .filter(|topic| topic.to_lowercase().starts_with(&partial));
            return Ok(("/topic ".len(), pairs(topics)));
        }

        if let Some(partial) = line.strip_prefix("/lesson ") {
            let ids = lesson::catalog()
                .iter()
                .map(|topic| topic.id)
                .filter(|id| id.starts_with(partial));
            return Ok(("/lesson ".len(), pairs(ids)));
        }

        if line.starts_with('/') && !line.contains(' ') {
            let commands = COMMANDS
                .iter()
                .map(|(command, _)| *command)
                .filter(|command| command.starts_with(line));
            Ok((0, pairs(commands)))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        match classify(line) {
            LineKind::Text => Borrowed(line),
            LineKind::Quit => Owned(line.bright_red().to_string()),
            LineKind::Unknown => Owned(line.red().to_string()),
            LineKind::Command { .. } => match line.split_once(' ') {
                Some((name, argument)) => Owned(format!(
                    "{} {}",
                    name.bright_cyan(),
                    argument.bright_white()
                )),
                None => Owned(line.bright_cyan().to_string()),
            },
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, line: &str, _pos: usize, _forced: bool) -> bool {
        classify(line) != LineKind::Text
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        hint_for(&line[..pos])
    }
}

impl Validator for CliHelper {}
