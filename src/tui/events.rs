use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CEvent, KeyEvent};

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize,
    /// Periodic wake-up so the app can notice the calendar day rolling over
    Tick,
}

/// Reads terminal input on a helper thread and forwards it, interleaved
/// with ticks, over a channel. Everything else stays on the main thread.
pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::ZERO);

                match event::poll(timeout) {
                    Ok(true) => {
                        let forwarded = match event::read() {
                            Ok(CEvent::Key(key)) => Some(Event::Key(key)),
                            Ok(CEvent::Resize(_, _)) => Some(Event::Resize),
                            Ok(_) => None,
                            Err(e) => {
                                log::warn!("terminal event read failed: {}", e);
                                break;
                            }
                        };
                        if let Some(ev) = forwarded {
                            if tx.send(ev).is_err() {
                                break;
                            }
                        }
                    }
                    Ok(false) => {}
                    Err(e) => {
                        log::warn!("terminal event poll failed: {}", e);
                        break;
                    }
                }

                if last_tick.elapsed() >= tick_rate {
                    if tx.send(Event::Tick).is_err() {
                        break;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        Self { rx }
    }

    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }
}
