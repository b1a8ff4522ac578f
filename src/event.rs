use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tracing::warn;

/// Fast enough for the sidebar animation to look smooth (~30 fps).
pub const TICK_RATE: Duration = Duration::from_millis(33);

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    Resize { width: u16, height: u16 },
}

/// Reads terminal input on a background thread. When no input arrives within
/// the tick rate a `Tick` is sent so timers and animations keep moving.
pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
    _tx: mpsc::Sender<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let _tx = tx.clone();

        thread::spawn(move || {
            loop {
                let ready = match event::poll(tick_rate) {
                    Ok(ready) => ready,
                    Err(err) => {
                        warn!(error = %err, "terminal poll failed");
                        false
                    }
                };
                let next = if ready {
                    match event::read() {
                        // Release/repeat events are ignored; navigation is press-driven.
                        Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
                        Ok(Event::Resize(width, height)) => Some(AppEvent::Resize { width, height }),
                        Ok(_) => None,
                        Err(err) => {
                            warn!(error = %err, "terminal read failed");
                            None
                        }
                    }
                } else {
                    Some(AppEvent::Tick)
                };
                if let Some(event) = next {
                    if tx.send(event).is_err() {
                        return;
                    }
                }
            }
        });

        Self { rx, _tx }
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}
