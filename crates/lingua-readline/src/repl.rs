//! Read-eval-print loop.
//!
//! Input is read on the main task. Requests that call the generative service
//! run on spawned tasks and report back over an mpsc channel to a printer
//! task, so the prompt never waits on the network.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use lingua_application::TutorSession;
use lingua_core::chat::ChatMessage;
use lingua_core::lesson::LessonContent;
use lingua_core::quiz::QuizPhase;
use lingua_core::vocab::VocabCard;
use lingua_core::{Delivery, Screen};
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::commands::{self, Command};
use crate::helper::CliHelper;
use crate::render;

/// Result of a background request.
#[derive(Debug)]
pub enum Event {
    Chat(lingua_core::Result<Delivery<ChatMessage>>),
    Lesson(lingua_core::Result<Delivery<LessonContent>>),
    Vocab(lingua_core::Result<Delivery<Option<VocabCard>>>),
    Speech {
        word: Option<String>,
        result: lingua_core::Result<Delivery<Option<PathBuf>>>,
    },
    QuizLoaded(lingua_core::Result<Delivery<usize>>),
    /// The reveal delay after an answer elapsed.
    QuizAdvanced(bool),
}

/// Prints background results as they arrive, followed by any new notices.
pub fn spawn_printer(
    session: Arc<TutorSession>,
    mut events: mpsc::Receiver<Event>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            print_event(&session, event).await;
            render::notices(&session.take_notices().await);
        }
    })
}

async fn print_event(session: &TutorSession, event: Event) {
    match event {
        Event::Chat(Ok(Delivery::Applied(message))) => render::chat_message(&message),
        Event::Chat(Ok(Delivery::Discarded)) => render::discarded("The tutor's reply"),
        Event::Lesson(Ok(Delivery::Applied(content))) => render::lesson_body(&content),
        Event::Lesson(Ok(Delivery::Discarded)) => render::discarded("The lesson"),
        Event::Vocab(Ok(Delivery::Applied(Some(card)))) => render::vocab_card(&card),
        Event::Vocab(Ok(Delivery::Applied(None))) => {}
        Event::Vocab(Ok(Delivery::Discarded)) => render::discarded("The flashcard"),
        Event::Speech {
            word,
            result: Ok(Delivery::Applied(Some(location))),
        } => render::played(word.as_deref().unwrap_or_default(), Some(location.as_path())),
        Event::Speech {
            result: Ok(Delivery::Applied(None)),
            ..
        } => {}
        Event::Speech {
            result: Ok(Delivery::Discarded),
            ..
        } => render::discarded("The pronunciation"),
        Event::QuizLoaded(Ok(Delivery::Applied(_))) => {
            render::quiz(session.snapshot().await.quiz());
        }
        Event::QuizLoaded(Ok(Delivery::Discarded)) => render::discarded("The quiz"),
        Event::QuizAdvanced(true) => {
            let state = session.snapshot().await;
            if state.screen() == Screen::Quiz {
                render::quiz(state.quiz());
            }
        }
        Event::QuizAdvanced(false) => {}
        Event::Chat(Err(err))
        | Event::Lesson(Err(err))
        | Event::Vocab(Err(err))
        | Event::Speech {
            result: Err(err), ..
        }
        | Event::QuizLoaded(Err(err)) => render::error(&err),
    }
}

pub struct Repl {
    session: Arc<TutorSession>,
    events: mpsc::Sender<Event>,
    reveal_delay: Duration,
}

impl Repl {
    pub fn new(
        session: Arc<TutorSession>,
        events: mpsc::Sender<Event>,
        reveal_delay: Duration,
    ) -> Self {
        Self {
            session,
            events,
            reveal_delay,
        }
    }

    /// Runs until the user quits. Consumes the REPL so its event sender is
    /// dropped when the loop ends.
    pub async fn run(self) -> Result<()> {
        let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
        rl.set_helper(Some(CliHelper::new()));

        render::banner();
        render::screen(&self.session.snapshot().await);

        loop {
            let prompt = format!("{}> ", self.session.screen().await);
            match rl.readline(&prompt) {
                Ok(line) => {
                    let Some(command) = commands::parse(&line) else {
                        continue;
                    };
                    let _ = rl.add_history_entry(line.trim());
                    if command == Command::Quit {
                        println!("{}", "Xayr! Goodbye!".bright_green());
                        break;
                    }
                    self.handle(command).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
                }
                Err(ReadlineError::Eof) => {
                    println!("{}", "CTRL-D detected. Exiting...".bright_green());
                    break;
                }
                Err(err) => {
                    eprintln!("{}", format!("Error: {err:?}").red());
                    break;
                }
            }
        }
        Ok(())
    }

    async fn handle(&self, command: Command) {
        debug!(?command, "Handling command");
        match command {
            Command::Go(screen) => {
                self.session.navigate(screen).await;
                render::screen(&self.session.snapshot().await);
            }
            Command::OpenLesson(id) => self.open_lesson(id),
            Command::Back => {
                self.session.close_lesson().await;
                self.session.navigate(Screen::Lessons).await;
                render::catalog();
            }
            Command::Lookup(word) => self.lookup(word),
            Command::Speak => self.speak().await,
            Command::Topic(topic) => match self.session.select_quiz_topic(&topic).await {
                Ok(()) => println!("Topic: {}", topic.bold()),
                Err(err) => render::error(&err),
            },
            Command::StartQuiz => self.start_quiz(),
            Command::Answer(option) => self.answer(option).await,
            Command::Status => render::status(&self.session.snapshot().await),
            Command::Help => render::help(),
            Command::Quit => {}
            Command::Text(text) => self.route_text(text).await,
            Command::Invalid(message) => render::usage(&message),
        }
    }

    /// Plain input means what the active screen expects.
    async fn route_text(&self, text: String) {
        let state = self.session.snapshot().await;
        match state.screen() {
            Screen::Chat => self.send_chat(text),
            Screen::Vocabulary => self.lookup(text),
            Screen::Lessons => self.open_lesson(text),
            Screen::Quiz => match (state.quiz().phase(), commands::parse_option(&text)) {
                (QuizPhase::InProgress { .. }, Some(option)) => self.answer(option).await,
                (QuizPhase::InProgress { .. }, None) => {
                    render::usage("Answer with 1-4 or a-d.")
                }
                _ => render::usage("/topic <name> to change the topic, /start to begin."),
            },
            Screen::Home => render::usage("Pick a section first, e.g. /chat. See /help."),
        }
    }

    fn send_chat(&self, text: String) {
        let session = self.session.clone();
        self.dispatch(async move { Event::Chat(session.send_chat_message(&text).await) });
    }

    fn open_lesson(&self, id: String) {
        let session = self.session.clone();
        self.dispatch(async move { Event::Lesson(session.open_lesson(&id).await) });
    }

    fn lookup(&self, word: String) {
        let session = self.session.clone();
        self.dispatch(async move { Event::Vocab(session.lookup_word(&word).await) });
    }

    async fn speak(&self) {
        let word = self
            .session
            .snapshot()
            .await
            .card()
            .map(|card| card.word.clone());
        let session = self.session.clone();
        self.dispatch(async move {
            Event::Speech {
                word,
                result: session.play_pronunciation().await,
            }
        });
    }

    fn start_quiz(&self) {
        let session = self.session.clone();
        self.dispatch(async move { Event::QuizLoaded(session.start_quiz().await) });
    }

    async fn answer(&self, option: usize) {
        let outcome = match self.session.answer_quiz(option).await {
            Ok(outcome) => outcome,
            Err(err) => {
                render::error(&err);
                return;
            }
        };
        let state = self.session.snapshot().await;
        let options = state
            .quiz()
            .questions()
            .get(outcome.index)
            .map(|question| question.options.clone())
            .unwrap_or_default();
        render::answer_outcome(&outcome, &options);

        let session = self.session.clone();
        let delay = self.reveal_delay;
        self.dispatch(async move {
            tokio::time::sleep(delay).await;
            Event::QuizAdvanced(session.advance_quiz(outcome.generation, outcome.index).await)
        });
    }

    fn dispatch<F>(&self, request: F)
    where
        F: Future<Output = Event> + Send + 'static,
    {
        let tx = self.events.clone();
        tokio::spawn(async move {
            let _ = tx.send(request.await).await;
        });
    }
}
