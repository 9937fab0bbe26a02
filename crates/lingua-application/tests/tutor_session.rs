mod common;

use common::{
    MockGenerationService, RecordingPlayer, question, session, session_with, wait_until_busy,
};
use lingua_core::chat::MessageRole;
use lingua_core::quiz::{QuizPhase, Verdict};
use lingua_core::texts::{
    CHAT_EMPTY_REPLY, CHAT_FAILED, CHAT_GREETING, LESSON_FAILED, QUIZ_FAILED, SPEECH_FAILED,
    VOCAB_FAILED,
};
use lingua_core::{Delivery, Feature, LinguaError, Screen};
use std::sync::Arc;
use tokio::sync::Semaphore;

// ============================================================================
// Chat
// ============================================================================

#[tokio::test]
async fn test_chat_appends_user_message_and_reply() {
    let (session, service) = session(MockGenerationService::default());

    let reply = session
        .send_chat_message("  I goed to school  ")
        .await
        .unwrap()
        .applied()
        .unwrap();
    assert_eq!(reply.role, MessageRole::Assistant);

    let state = session.snapshot().await;
    let messages = state.conversation().messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].role, MessageRole::User);
    assert_eq!(messages[1].text, "I goed to school");
    assert_eq!(messages[2], reply);
    assert!(!state.is_busy(Feature::Chat));
    assert_eq!(state.screen(), Screen::Chat);

    // History excludes the message being sent.
    let histories = service.chat_histories.lock().unwrap();
    assert_eq!(histories[0].len(), 1);
    assert_eq!(histories[0][0].text, CHAT_GREETING);
}

#[tokio::test]
async fn test_failed_chat_appends_exactly_one_fallback() {
    let (session, _service) = session(MockGenerationService::failing());

    session.send_chat_message("Hello").await.unwrap();

    let state = session.snapshot().await;
    let messages = state.conversation().messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[2].role, MessageRole::Assistant);
    assert_eq!(messages[2].text, CHAT_FAILED);
    assert_eq!(
        messages.iter().filter(|m| m.text == CHAT_FAILED).count(),
        1
    );
    assert!(!state.is_busy(Feature::Chat));
}

#[tokio::test]
async fn test_empty_chat_reply_uses_apology() {
    let (session, _service) = session(MockGenerationService {
        chat_reply: None,
        ..MockGenerationService::default()
    });

    let reply = session.send_chat_message("Hi").await.unwrap().applied().unwrap();
    assert_eq!(reply.text, CHAT_EMPTY_REPLY);
}

#[tokio::test]
async fn test_blank_chat_message_is_not_sent() {
    let (session, service) = session(MockGenerationService::default());

    let err = session.send_chat_message("   ").await.unwrap_err();
    assert_eq!(err, LinguaError::EmptyInput { feature: Feature::Chat });
    assert_eq!(service.call_count(), 0);
    assert_eq!(session.snapshot().await.conversation().len(), 1);
}

#[tokio::test]
async fn test_second_chat_message_rejected_while_busy() {
    let gate = Arc::new(Semaphore::new(0));
    let (session, service) = session(MockGenerationService::gated(gate.clone()));
    let session = Arc::new(session);

    let pending = {
        let session = session.clone();
        tokio::spawn(async move { session.send_chat_message("first").await })
    };
    wait_until_busy(&session, Feature::Chat).await;

    let err = session.send_chat_message("second").await.unwrap_err();
    assert!(err.is_busy());

    gate.add_permits(1);
    assert!(pending.await.unwrap().unwrap().is_applied());
    assert_eq!(service.call_count(), 1);
    assert_eq!(session.snapshot().await.conversation().len(), 3);
}

#[tokio::test]
async fn test_chat_reply_discarded_after_navigation() {
    let gate = Arc::new(Semaphore::new(0));
    let (session, _service) = session(MockGenerationService::gated(gate.clone()));
    let session = Arc::new(session);

    let pending = {
        let session = session.clone();
        tokio::spawn(async move { session.send_chat_message("Hello").await })
    };
    wait_until_busy(&session, Feature::Chat).await;

    assert!(session.navigate(Screen::Home).await);
    gate.add_permits(1);

    let delivery = pending.await.unwrap().unwrap();
    assert_eq!(delivery, Delivery::Discarded);

    let state = session.snapshot().await;
    assert_eq!(state.screen(), Screen::Home);
    assert_eq!(state.conversation().len(), 2);
    assert!(!state.is_busy(Feature::Chat));
}

// ============================================================================
// Lessons
// ============================================================================

#[tokio::test]
async fn test_open_lesson_loads_markdown() {
    let (session, _service) = session(MockGenerationService::default());

    let content = session.open_lesson("4").await.unwrap().applied().unwrap();
    assert_eq!(content.topic_id, "4");
    assert!(content.markdown.starts_with("# Conditionals"));
    assert!(content.markdown.contains("Intermediate"));

    let state = session.snapshot().await;
    assert_eq!(state.screen(), Screen::Lessons);
    assert_eq!(state.lessons().content(), Some(&content));
}

#[tokio::test]
async fn test_failed_lesson_shows_fallback_text() {
    let (session, _service) = session(MockGenerationService::failing());

    let content = session.open_lesson("1").await.unwrap().applied().unwrap();
    assert_eq!(content.markdown, LESSON_FAILED);
    assert!(!session.snapshot().await.is_busy(Feature::Lesson));
}

#[tokio::test]
async fn test_unknown_lesson_is_not_found() {
    let (session, service) = session(MockGenerationService::default());

    let err = session.open_lesson("42").await.unwrap_err();
    assert!(matches!(err, LinguaError::NotFound { entity_type: "lesson", .. }));
    assert_eq!(service.call_count(), 0);
}

#[tokio::test]
async fn test_lesson_closed_while_loading_is_discarded() {
    let gate = Arc::new(Semaphore::new(0));
    let (session, _service) = session(MockGenerationService::gated(gate.clone()));
    let session = Arc::new(session);

    let pending = {
        let session = session.clone();
        tokio::spawn(async move { session.open_lesson("2").await })
    };
    wait_until_busy(&session, Feature::Lesson).await;

    session.close_lesson().await;
    gate.add_permits(1);

    assert_eq!(pending.await.unwrap().unwrap(), Delivery::Discarded);
    assert!(session.snapshot().await.lessons().open_topic().is_none());
}

#[tokio::test]
async fn test_stale_lesson_returns_to_catalog() {
    let gate = Arc::new(Semaphore::new(0));
    let (session, _service) = session(MockGenerationService::gated(gate.clone()));
    let session = Arc::new(session);

    let pending = {
        let session = session.clone();
        tokio::spawn(async move { session.open_lesson("3").await })
    };
    wait_until_busy(&session, Feature::Lesson).await;

    session.navigate(Screen::Quiz).await;
    gate.add_permits(1);

    assert_eq!(pending.await.unwrap().unwrap(), Delivery::Discarded);
    let state = session.snapshot().await;
    assert!(state.lessons().content().is_none());
    assert!(state.lessons().open_topic().is_none());
}

// ============================================================================
// Vocabulary
// ============================================================================

#[tokio::test]
async fn test_lookup_builds_card_with_generated_image() {
    let (session, service) = session(MockGenerationService::default());

    let card = session.lookup_word(" apple ").await.unwrap().applied().flatten().unwrap();
    assert_eq!(card.word, "apple");
    assert_eq!(card.definition, "olma");
    assert!(!card.image.is_placeholder());
    assert!(card.image.src().starts_with("data:image/png;base64,"));
    assert_eq!(service.call_count(), 2);

    assert_eq!(session.snapshot().await.card(), Some(&card));
}

#[tokio::test]
async fn test_image_failure_falls_back_to_placeholder() {
    let (session, _service) = session(MockGenerationService {
        image_fails: true,
        ..MockGenerationService::default()
    });

    let card = session.lookup_word("cat").await.unwrap().applied().flatten().unwrap();
    assert!(card.image.is_placeholder());
    assert_eq!(card.image.src(), "https://picsum.photos/seed/cat/400/300");
    assert!(session.take_notices().await.is_empty());
}

#[tokio::test]
async fn test_missing_definition_fields_use_defaults() {
    let (session, _service) = session(MockGenerationService {
        definition: Default::default(),
        image: None,
        ..MockGenerationService::default()
    });

    let card = session.lookup_word("zyx").await.unwrap().applied().flatten().unwrap();
    assert_eq!(card.definition, "Topilmadi");
    assert_eq!(card.example, "Misol mavjud emas");
    assert!(card.image.is_placeholder());
}

#[tokio::test]
async fn test_empty_lookup_leaves_card_untouched() {
    let (session, service) = session(MockGenerationService::default());
    session.lookup_word("apple").await.unwrap();
    let calls = service.call_count();
    let before = session.snapshot().await.card().cloned();

    let err = session.lookup_word("  ").await.unwrap_err();
    assert!(err.is_empty_input());
    assert_eq!(service.call_count(), calls);
    assert_eq!(session.snapshot().await.card().cloned(), before);
}

#[tokio::test]
async fn test_failed_lookup_clears_card_and_raises_notice() {
    let (session, _service) = session(MockGenerationService::failing());

    let delivery = session.lookup_word("apple").await.unwrap();
    assert_eq!(delivery, Delivery::Applied(None));

    let state = session.snapshot().await;
    assert!(state.card().is_none());
    assert!(!state.is_busy(Feature::Vocab));

    let notices = session.take_notices().await;
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].feature, Feature::Vocab);
    assert_eq!(notices[0].text, VOCAB_FAILED);
    assert!(session.take_notices().await.is_empty());
}

// ============================================================================
// Speech
// ============================================================================

#[tokio::test]
async fn test_pronunciation_requires_card() {
    let (session, service) = session(MockGenerationService::default());
    let err = session.play_pronunciation().await.unwrap_err();
    assert!(matches!(err, LinguaError::InvalidState(_)));
    assert_eq!(service.call_count(), 0);
}

#[tokio::test]
async fn test_pronunciation_is_played_and_attached() {
    let service = Arc::new(MockGenerationService::default());
    let player = Arc::new(RecordingPlayer::default());
    let session = session_with(service, player.clone());
    session.lookup_word("apple").await.unwrap();

    let location = session.play_pronunciation().await.unwrap().applied().flatten();
    assert_eq!(location.unwrap().to_str(), Some("/tmp/apple.wav"));

    let played = player.played.lock().unwrap();
    assert_eq!(played.len(), 1);
    assert_eq!(played[0].0, "apple");
    assert_eq!(played[0].1.data, vec![1, 0, 2, 0]);

    let state = session.snapshot().await;
    assert_eq!(state.card().unwrap().audio.as_ref(), Some(&played[0].1));
    assert!(!state.is_busy(Feature::Speech));
}

#[tokio::test]
async fn test_missing_audio_raises_notice() {
    let service = Arc::new(MockGenerationService {
        audio: None,
        ..MockGenerationService::default()
    });
    let player = Arc::new(RecordingPlayer::default());
    let session = session_with(service, player.clone());
    session.lookup_word("apple").await.unwrap();

    let delivery = session.play_pronunciation().await.unwrap();
    assert_eq!(delivery, Delivery::Applied(None));
    assert!(player.played.lock().unwrap().is_empty());

    let notices = session.take_notices().await;
    assert_eq!(notices[0].text, SPEECH_FAILED);
    assert!(!session.snapshot().await.is_busy(Feature::Speech));
}

#[tokio::test]
async fn test_playback_failure_clears_busy_flag() {
    let service = Arc::new(MockGenerationService::default());
    let player = Arc::new(RecordingPlayer {
        fail: true,
        ..RecordingPlayer::default()
    });
    let session = session_with(service, player);
    session.lookup_word("apple").await.unwrap();

    assert_eq!(
        session.play_pronunciation().await.unwrap(),
        Delivery::Applied(None)
    );
    assert!(!session.snapshot().await.is_busy(Feature::Speech));
    assert_eq!(session.take_notices().await.len(), 1);
}

// ============================================================================
// Quiz
// ============================================================================

#[tokio::test]
async fn test_full_quiz_flow() {
    let (session, _service) = session(MockGenerationService::default());
    session.select_quiz_topic("Verbs").await.unwrap();

    let count = session.start_quiz().await.unwrap().applied().unwrap();
    assert_eq!(count, 3);

    // correct answers are 1, 0, 3
    let first = session.answer_quiz(1).await.unwrap();
    assert!(first.correct);
    assert!(session.answer_quiz(2).await.unwrap_err().to_string().contains("already"));
    assert!(session.advance_quiz(first.generation, 0).await);

    let second = session.answer_quiz(2).await.unwrap();
    assert!(!second.correct);
    assert_eq!(second.correct_answer, 0);
    assert!(session.advance_quiz(second.generation, 1).await);

    let third = session.answer_quiz(3).await.unwrap();
    assert!(third.is_last);
    assert!(session.advance_quiz(third.generation, 2).await);

    let state = session.snapshot().await;
    assert_eq!(state.quiz().phase(), QuizPhase::Completed);
    let result = state.quiz().result().unwrap();
    assert_eq!((result.score, result.total), (2, 3));
    assert_eq!(result.verdict, Verdict::Good);
    assert_eq!(state.quiz().topic(), "Verbs");
}

#[tokio::test]
async fn test_failed_quiz_returns_to_start_screen() {
    let (session, _service) = session(MockGenerationService::failing());

    assert_eq!(session.start_quiz().await.unwrap(), Delivery::Applied(0));
    let state = session.snapshot().await;
    assert_eq!(state.quiz().phase(), QuizPhase::Idle);
    assert!(!state.is_busy(Feature::Quiz));
    assert_eq!(session.take_notices().await[0].text, QUIZ_FAILED);
}

#[tokio::test]
async fn test_unplayable_questions_are_dropped() {
    let mut broken = question(0);
    broken.correct_answer = 7;
    let (session, _service) = session(MockGenerationService {
        quiz: vec![broken, question(2)],
        ..MockGenerationService::default()
    });

    assert_eq!(session.start_quiz().await.unwrap(), Delivery::Applied(1));
}

#[tokio::test]
async fn test_quiz_abandoned_during_loading_resets() {
    let gate = Arc::new(Semaphore::new(0));
    let (session, _service) = session(MockGenerationService::gated(gate.clone()));
    let session = Arc::new(session);

    let pending = {
        let session = session.clone();
        tokio::spawn(async move { session.start_quiz().await })
    };
    wait_until_busy(&session, Feature::Quiz).await;
    assert_eq!(session.snapshot().await.quiz().phase(), QuizPhase::Loading);

    let err = session.start_quiz().await.unwrap_err();
    assert!(err.is_busy());

    session.navigate(Screen::Vocabulary).await;
    gate.add_permits(1);

    assert_eq!(pending.await.unwrap().unwrap(), Delivery::Discarded);
    let state = session.snapshot().await;
    assert_eq!(state.quiz().phase(), QuizPhase::Idle);
    assert!(state.quiz().questions().is_empty());
}

#[tokio::test]
async fn test_answer_without_quiz_is_rejected() {
    let (session, _service) = session(MockGenerationService::default());
    assert!(session.answer_quiz(0).await.is_err());
    assert!(!session.advance_quiz(0, 0).await);
}

// ============================================================================
// Cross-feature
// ============================================================================

#[tokio::test]
async fn test_busy_guards_are_per_feature() {
    let gate = Arc::new(Semaphore::new(0));
    let (session, _service) = session(MockGenerationService::gated(gate.clone()));
    let session = Arc::new(session);

    let chat = {
        let session = session.clone();
        tokio::spawn(async move { session.send_chat_message("Hi").await })
    };
    wait_until_busy(&session, Feature::Chat).await;

    let quiz = {
        let session = session.clone();
        tokio::spawn(async move { session.start_quiz().await })
    };
    wait_until_busy(&session, Feature::Quiz).await;
    assert_eq!(
        session.snapshot().await.busy_features(),
        vec![Feature::Chat, Feature::Quiz]
    );

    gate.add_permits(2);
    // Starting the quiz navigated away from chat, so the chat reply is stale.
    assert_eq!(chat.await.unwrap().unwrap(), Delivery::Discarded);
    assert_eq!(quiz.await.unwrap().unwrap(), Delivery::Applied(3));
    assert!(session.snapshot().await.busy_features().is_empty());
}

#[tokio::test]
async fn test_late_advance_from_restarted_quiz_is_ignored() {
    let (session, _service) = session(MockGenerationService::default());

    session.start_quiz().await.unwrap();
    let old = session.answer_quiz(1).await.unwrap();

    session.start_quiz().await.unwrap();
    let current = session.answer_quiz(1).await.unwrap();

    // The reveal timer of the first quiz fires after the restart.
    assert!(!session.advance_quiz(old.generation, old.index).await);
    assert_eq!(
        session.snapshot().await.quiz().phase(),
        QuizPhase::InProgress {
            index: 0,
            selected: Some(1)
        }
    );

    assert!(session.advance_quiz(current.generation, current.index).await);
    assert_eq!(
        session.snapshot().await.quiz().phase(),
        QuizPhase::InProgress {
            index: 1,
            selected: None
        }
    );
}

// ============================================================================
// Late responses on the vocabulary screen
// ============================================================================

#[tokio::test]
async fn test_flashcard_discarded_after_navigation() {
    let gate = Arc::new(Semaphore::new(0));
    let (session, _service) = session(MockGenerationService::gated(gate.clone()));
    let session = Arc::new(session);

    let pending = {
        let session = session.clone();
        tokio::spawn(async move { session.lookup_word("apple").await })
    };
    wait_until_busy(&session, Feature::Vocab).await;

    session.navigate(Screen::Chat).await;
    // definition and illustration
    gate.add_permits(2);

    assert_eq!(pending.await.unwrap().unwrap(), Delivery::Discarded);
    let state = session.snapshot().await;
    assert!(state.card().is_none());
    assert!(!state.is_busy(Feature::Vocab));
    assert_eq!(state.screen(), Screen::Chat);
    assert!(session.take_notices().await.is_empty());
}

#[tokio::test]
async fn test_pronunciation_discarded_after_navigation() {
    let gate = Arc::new(Semaphore::new(0));
    let service = Arc::new(MockGenerationService::gated(gate.clone()));
    let player = Arc::new(RecordingPlayer::default());
    let session = Arc::new(session_with(service, player.clone()));

    gate.add_permits(2);
    session.lookup_word("apple").await.unwrap();

    let pending = {
        let session = session.clone();
        tokio::spawn(async move { session.play_pronunciation().await })
    };
    wait_until_busy(&session, Feature::Speech).await;

    session.navigate(Screen::Quiz).await;
    gate.add_permits(1);

    assert_eq!(pending.await.unwrap().unwrap(), Delivery::Discarded);
    assert!(player.played.lock().unwrap().is_empty());

    let state = session.snapshot().await;
    assert!(state.card().unwrap().audio.is_none());
    assert!(!state.is_busy(Feature::Speech));
}

#[tokio::test]
async fn test_unanswered_message_is_left_out_of_next_history() {
    let gate = Arc::new(Semaphore::new(0));
    let (session, service) = session(MockGenerationService::gated(gate.clone()));
    let session = Arc::new(session);

    let pending = {
        let session = session.clone();
        tokio::spawn(async move { session.send_chat_message("Lost message").await })
    };
    wait_until_busy(&session, Feature::Chat).await;
    session.navigate(Screen::Home).await;
    gate.add_permits(1);
    assert_eq!(pending.await.unwrap().unwrap(), Delivery::Discarded);

    gate.add_permits(1);
    session.send_chat_message("Second try").await.unwrap();

    let histories = service.chat_histories.lock().unwrap();
    let last: Vec<&str> = histories[1].iter().map(|turn| turn.text.as_str()).collect();
    assert_eq!(last, vec![CHAT_GREETING]);
    // The transcript still shows the unanswered message.
    drop(histories);
    assert_eq!(session.snapshot().await.conversation().len(), 4);
}
