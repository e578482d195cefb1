use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

const POLL_INTERVAL: Duration = Duration::from_millis(150);

/// Watches the keyboard for `q`/Ctrl-C during a sweep and flips the
/// engine's cancel flag.
///
/// The watcher polls instead of blocking on `read` so it can exit when
/// the run finishes without waiting for a final keypress.
pub struct InputHandle {
    done: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl InputHandle {
    pub fn new() -> Self {
        Self {
            done: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    pub fn start(&mut self, cancel: Arc<AtomicBool>) {
        if self.handle.is_some() {
            return;
        }
        if enable_raw_mode().is_err() {
            // Not a terminal; the sweep runs without an interrupt key.
            return;
        }

        let done = Arc::clone(&self.done);
        self.handle = Some(thread::spawn(move || {
            while !done.load(Ordering::Relaxed) {
                match event::poll(POLL_INTERVAL) {
                    Ok(true) => {
                        if let Ok(Event::Key(key_event)) = event::read() {
                            let is_q = key_event.code == KeyCode::Char('q');
                            let is_ctrl_c = key_event.code == KeyCode::Char('c')
                                && key_event.modifiers.contains(KeyModifiers::CONTROL);

                            if (is_q || is_ctrl_c) && key_event.kind == KeyEventKind::Press {
                                cancel.store(true, Ordering::Relaxed);
                                break;
                            }
                        }
                    }
                    Ok(false) => {}
                    Err(_) => break,
                }
            }
            let _ = disable_raw_mode();
        }));
    }

    pub fn stop(&mut self) {
        self.done.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Default for InputHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputHandle {
    fn drop(&mut self) {
        self.stop();
        let _ = disable_raw_mode();
    }
}
