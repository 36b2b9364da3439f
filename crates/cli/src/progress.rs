//! Indeterminate progress spinner on stderr.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Spinner on a helper thread. Joined on drop, so an early `?` return in
/// the calling command still clears the line.
pub struct Spinner {
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Spinner {
    /// Animates only when stderr is a TTY; otherwise prints the message
    /// once so piped output stays clean.
    pub fn start(msg: &str) -> Self {
        let running = Arc::new(AtomicBool::new(true));

        if !atty::is(atty::Stream::Stderr) {
            eprintln!("{}", msg);
            return Self {
                running,
                handle: None,
            };
        }

        let msg = msg.to_string();
        let flag = Arc::clone(&running);
        let handle = thread::spawn(move || {
            let mut tick = 0usize;
            while flag.load(Ordering::Relaxed) {
                eprint!("\r{} {}", msg, FRAMES[tick % FRAMES.len()]);
                std::io::stderr().flush().ok();
                tick += 1;
                thread::sleep(FRAME_INTERVAL);
            }
            // Clear the spinner line. +2 covers the space and frame glyph.
            eprint!("\r{}\r", " ".repeat(msg.chars().count() + 2));
            std::io::stderr().flush().ok();
        });

        Self {
            running,
            handle: Some(handle),
        }
    }

    fn finish(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            handle.join().ok();
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.finish();
    }
}
