use crate::app::{App, ApplyMode};
use crate::messages::{BackendEvent, BackendSender, ViewEvent, ViewReceiver};
use crate::ui;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use std::time::{Duration, Instant};

pub async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    view_rx: &mut ViewReceiver,
    backend_tx: &BackendSender,
) -> Result<()> {
    // The element tree exists as soon as we can draw a frame; tell the
    // backend it is safe to start sending snapshots.
    backend_tx.send(BackendEvent::ViewReady)?;

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // Drain everything the backend sent since the last frame, in order.
        while let Ok(view_event) = view_rx.try_recv() {
            match view_event {
                ViewEvent::StatusUpdated { snapshot, reset } => {
                    let mode = if reset {
                        ApplyMode::Reset
                    } else {
                        ApplyMode::Incremental
                    };
                    app.apply_snapshot(&snapshot, mode);
                }
                ViewEvent::Error(message) => app.set_error(&message),
                ViewEvent::Show => app.hidden = false,
                ViewEvent::Hide => app.hidden = true,
                ViewEvent::Close => return Ok(()),
            }
        }

        // Expire transient copy feedback.
        app.tick(Instant::now());

        // Poll for events with timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                handle_key(app, backend_tx, key);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, backend_tx: &BackendSender, key: KeyEvent) {
    // Terminal owner pulled the plug; don't route through the close
    // intercept, just terminate.
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // Help popup handling
    if app.show_help {
        match key.code {
            KeyCode::Esc => app.show_help = false,
            KeyCode::Char(c) if c == app.shortcuts.help || c == app.shortcuts.quit => {
                app.show_help = false;
            }
            _ => {}
        }
        return;
    }

    // Clear status on any key press
    app.clear_status();

    // Hidden to the background: only show and quit are live.
    if app.hidden {
        match key.code {
            KeyCode::Char(c) if c == app.shortcuts.show => {
                send(app, backend_tx, BackendEvent::ShowRequested);
            }
            KeyCode::Char(c) if c == app.shortcuts.quit => {
                send(app, backend_tx, BackendEvent::CloseRequested);
            }
            _ => {}
        }
        return;
    }

    match key.code {
        // Close goes through the backend intercept, which decides
        // between hide and quit.
        KeyCode::Char(c) if c == app.shortcuts.quit => {
            send(app, backend_tx, BackendEvent::CloseRequested);
        }

        KeyCode::Char(c) if c == app.shortcuts.help => app.toggle_help(),

        // Yank the selected row's launch entry to the clipboard
        KeyCode::Char(c) if c == app.shortcuts.copy => {
            app.copy_selected(Instant::now());
        }

        KeyCode::Char('j') | KeyCode::Down => app.list_next(),
        KeyCode::Char('k') | KeyCode::Up => app.list_prev(),

        _ => {}
    }
}

fn send(app: &mut App, backend_tx: &BackendSender, event: BackendEvent) {
    // The backend going away means the window is gone too.
    if backend_tx.send(event).is_err() {
        app.should_quit = true;
    }
}
