use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event as CEvent, KeyEvent};

use crate::config::settings::MIN_TICK_RATE_MS;
use crate::error::DashboardError;
use crate::models::Coordinates;
use crate::platform::LocationProvider;

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Tick,
    Location(Result<Coordinates, DashboardError>),
}

/// Longest single wait on the terminal, so a stop request is seen promptly.
const POLL_SLICE: Duration = Duration::from_millis(100);

/// Owns the input thread; dropping the handler stops and joins it, so the
/// next screen's handler is the only reader of the terminal.
pub struct EventHandler {
    tx: mpsc::Sender<Event>,
    rx: mpsc::Receiver<Event>,
    stop: Arc<AtomicBool>,
    input: Option<JoinHandle<()>>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let tick_rate = tick_rate.max(Duration::from_millis(MIN_TICK_RATE_MS));
        let input_tx = tx.clone();
        let stop = Arc::new(AtomicBool::new(false));
        let input_stop = Arc::clone(&stop);

        let input = thread::spawn(move || {
            let mut last_tick = std::time::Instant::now();
            while !input_stop.load(Ordering::Relaxed) {
                let timeout = tick_rate
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::ZERO)
                    .min(POLL_SLICE);

                match event::poll(timeout) {
                    Ok(true) => match event::read() {
                        Ok(CEvent::Key(key)) => {
                            if input_tx.send(Event::Key(key)).is_err() {
                                break;
                            }
                        }
                        Ok(_) => {}
                        Err(_) => break,
                    },
                    Ok(false) => {}
                    // No terminal to poll; keep ticking.
                    Err(_) => thread::sleep(timeout),
                }

                if last_tick.elapsed() >= tick_rate {
                    if input_tx.send(Event::Tick).is_err() {
                        break;
                    }
                    last_tick = std::time::Instant::now();
                }
            }
            log::debug!("input thread stopped");
        });

        Self {
            tx,
            rx,
            stop,
            input: Some(input),
        }
    }

    /// Run a one-shot location lookup off the UI thread; its result arrives
    /// as [`Event::Location`]. If the loop has already exited the result is
    /// dropped.
    pub fn request_location(&self, provider: Box<dyn LocationProvider>) {
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = provider.locate();
            let _ = tx.send(Event::Location(result));
        });
    }

    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(input) = self.input.take() {
            let _ = input.join();
        }
    }
}
