use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ollaix_core::{Config, I18n, Locale, TurnPhase};
use ollaix_providers::{DummyController, DummyTiming, MockController, MockEvent, MockResponse};
use ollaix_ui::{App, AppState, EventHandler, LoopEvent, MemoryClipboard, UiStrings};
use tokio::sync::mpsc;

fn create_test_app(responses: Vec<MockResponse>) -> App {
    let strings = UiStrings::resolve(&I18n::new(Locale::En).unwrap()).unwrap();
    let state = AppState::new(Config::default(), strings);
    App::new(state, Arc::new(MockController::new(responses))).with_clipboard(Box::new(MemoryClipboard::new()))
}

fn press(app: &mut App, event: KeyEvent) {
    if let Some(action) = EventHandler::handle_key_event(event, app.state_mut()) {
        app.handle_key_action(action);
    }
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
    }
}

async fn settle(app: &mut App) {
    while !app.state().models_loaded || app.state().is_generating() {
        let event = app.next_session_event().await.unwrap();
        app.handle_session_event(event);
    }
}

#[tokio::test]
async fn test_type_send_and_receive() {
    let mut app = create_test_app(vec![MockResponse::Sequence {
        events: vec![
            MockEvent::Thinking { text: "Let me think".into() },
            MockEvent::Content { text: "Paris".into() },
            MockEvent::Content { text: " is the capital.".into() },
            MockEvent::Done,
        ],
    }]);
    app.start();
    settle(&mut app).await;

    type_text(&mut app, "Capital of France?");
    press(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
    assert!(app.state().is_generating());
    assert!(app.state().composer.input.is_blank());

    settle(&mut app).await;

    let turns = app.state().transcript.turns();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].content, "Capital of France?");
    assert_eq!(turns[1].content, "Paris is the capital.");
    assert_eq!(turns[1].thinking_content.as_deref(), Some("Let me think"));
    assert_eq!(turns[1].phase(), TurnPhase::Done);
}

#[tokio::test]
async fn test_ctrl_c_stops_then_quits() {
    let mut app = create_test_app(vec![MockResponse::Sequence {
        events: vec![MockEvent::Delay { ms: 500 }, MockEvent::Done],
    }]);
    app.start();
    settle(&mut app).await;

    type_text(&mut app, "slow");
    press(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
    assert!(app.state().is_generating());

    press(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(!app.state().is_generating());
    assert!(app.exit().is_none());
    assert_eq!(app.state().transcript.last().unwrap().phase(), TurnPhase::Errored);

    press(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert_eq!(app.exit(), Some(ollaix_ui::AppExit::Quit));
}

#[tokio::test]
async fn test_edit_through_keys() {
    let mut app = create_test_app(vec![
        MockResponse::Text { content: "one".into(), thinking: None },
        MockResponse::Text { content: "two".into(), thinking: None },
    ]);
    app.start();
    settle(&mut app).await;

    type_text(&mut app, "first");
    press(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
    settle(&mut app).await;

    press(&mut app, KeyEvent::new(KeyCode::Up, KeyModifiers::ALT));
    press(&mut app, KeyEvent::new(KeyCode::Up, KeyModifiers::ALT));
    press(&mut app, KeyEvent::new(KeyCode::Char('e'), KeyModifiers::CONTROL));
    assert!(app.state().is_editing());

    type_text(&mut app, "!");
    press(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
    assert!(!app.state().is_editing());
    settle(&mut app).await;

    let turns = app.state().transcript.turns();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].content, "first!");
    assert_eq!(turns[1].content, "two");
}

#[tokio::test]
async fn test_keys_reach_loop_while_reply_streams() {
    let strings = UiStrings::resolve(&I18n::new(Locale::En).unwrap()).unwrap();
    let timing = DummyTiming { initial: Duration::ZERO, per_chunk: Duration::from_millis(20) };
    let controller = DummyController::new().with_timing(timing).with_seed(7);
    let mut app = App::new(AppState::new(Config::default(), strings), Arc::new(controller))
        .with_clipboard(Box::new(MemoryClipboard::new()));
    let (input_tx, mut input) = mpsc::unbounded_channel();

    app.start();
    while !app.state().models_loaded {
        let event = app.next_loop_event(&mut input).await;
        app.handle_loop_event(event);
    }

    for c in "hello".chars() {
        input_tx.send(Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))).unwrap();
    }
    input_tx.send(Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))).unwrap();

    while app.state().transcript.len() < 2 || app.state().transcript.last().unwrap().content.is_empty() {
        let event = app.next_loop_event(&mut input).await;
        app.handle_loop_event(event);
    }
    assert!(app.state().is_generating());

    // queue several chunks ahead of the key press
    tokio::time::sleep(Duration::from_millis(120)).await;
    input_tx.send(Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))).unwrap();

    let event = app.next_loop_event(&mut input).await;
    assert!(matches!(event, LoopEvent::Input(_)));
    app.handle_loop_event(event);

    assert!(!app.state().is_generating());
    assert!(app.exit().is_none());
    let reply = app.state().transcript.last().unwrap();
    assert_eq!(reply.phase(), TurnPhase::Done);
    assert!(!reply.content.is_empty());
}
