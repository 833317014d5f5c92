use super::{App, AppExit};
use crate::event_handler::EventHandler;
use crate::session::SessionEvent;
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use ollaix_providers::UpdateEvent;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Result, Write};
use std::panic;
use tokio::sync::mpsc;

/// One wake-up of the event loop
#[derive(Debug)]
pub enum LoopEvent {
    Input(Event),
    Session(SessionEvent),
    Update(UpdateEvent),
    /// The update checker went away
    UpdatesClosed,
    /// The terminal reader stopped
    InputClosed,
}

/// Terminal modes switched on for the TUI and undone on exit
#[derive(Debug, Clone, Copy)]
pub struct TerminalModes {
    keyboard_enhanced: bool,
}

impl TerminalModes {
    /// Kitty keyboard flags that make `Shift+Enter` distinct from `Enter`
    const KEYBOARD_FLAGS: KeyboardEnhancementFlags = KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES;

    /// Enter the alternate screen with bracketed paste, plus the keyboard
    /// flags when the terminal understands them
    pub fn enter<W: Write>(mut out: W, keyboard_enhanced: bool) -> Result<Self> {
        crossterm::execute!(out, EnterAlternateScreen, EnableBracketedPaste)?;
        if keyboard_enhanced {
            crossterm::execute!(out, PushKeyboardEnhancementFlags(Self::KEYBOARD_FLAGS))?;
        }
        Ok(Self { keyboard_enhanced })
    }

    /// Undo [`TerminalModes::enter`] in reverse order
    pub fn leave<W: Write>(&self, mut out: W) -> Result<()> {
        if self.keyboard_enhanced {
            crossterm::execute!(out, PopKeyboardEnhancementFlags)?;
        }
        crossterm::execute!(out, DisableBracketedPaste, LeaveAlternateScreen)
    }
}

impl App {
    /// Run the TUI until the user quits or accepts an update
    pub async fn run(&mut self) -> Result<AppExit> {
        crossterm::terminal::enable_raw_mode()?;
        let keyboard_enhanced = crossterm::terminal::supports_keyboard_enhancement().unwrap_or(false);
        tracing::debug!(keyboard_enhanced, "terminal capabilities");
        let modes = TerminalModes::enter(std::io::stdout(), keyboard_enhanced)?;

        let backend = CrosstermBackend::new(std::io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let backend = CrosstermBackend::new(std::io::stdout());
            if let Ok(mut terminal) = Terminal::new(backend) {
                let _ = terminal.show_cursor();
            }
            let _ = crossterm::terminal::disable_raw_mode();
            let _ = modes.leave(std::io::stdout());
            original_hook(panic_info);
        }));

        let mut input = EventHandler::spawn_reader();

        self.start();
        terminal.clear()?;
        self.draw(&mut terminal)?;

        while self.exit.is_none() {
            let event = self.next_loop_event(&mut input).await;
            self.handle_loop_event(event);
            self.draw(&mut terminal)?;
        }

        self.stop();

        terminal.show_cursor()?;
        crossterm::terminal::disable_raw_mode()?;
        modes.leave(std::io::stdout())?;

        Ok(self.exit.unwrap_or(AppExit::Quit))
    }

    /// Wait for the next thing the loop must react to
    ///
    /// Terminal input is checked first so a stop or quit key is seen even
    /// while a reply floods the session channel.
    pub async fn next_loop_event(&mut self, input: &mut mpsc::UnboundedReceiver<Event>) -> LoopEvent {
        tokio::select! {
            biased;

            maybe_input = input.recv() => match maybe_input {
                Some(event) => LoopEvent::Input(event),
                None => LoopEvent::InputClosed,
            },
            Some(event) = self.session_rx.recv() => LoopEvent::Session(event),
            maybe_update = recv_update(&mut self.update_rx) => match maybe_update {
                Some(event) => LoopEvent::Update(event),
                None => LoopEvent::UpdatesClosed,
            },
        }
    }

    pub fn handle_loop_event(&mut self, event: LoopEvent) {
        match event {
            LoopEvent::Input(event) => {
                if let Some(action) = EventHandler::handle_event(&event, &mut self.state) {
                    self.handle_key_action(action);
                }
            }
            LoopEvent::Session(event) => self.handle_session_event(event),
            LoopEvent::Update(event) => self.handle_update_event(event),
            LoopEvent::UpdatesClosed => self.update_rx = None,
            LoopEvent::InputClosed => {
                tracing::warn!("terminal input closed, exiting");
                self.stop();
                self.exit = Some(AppExit::Quit);
            }
        }
    }
}

/// Next update notice, or never when nobody is checking
async fn recv_update(rx: &mut Option<mpsc::Receiver<UpdateEvent>>) -> Option<UpdateEvent> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
