use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use ipidriver::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// Spinner on stderr that follows a driver session.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let pb = ProgressBar::new_spinner()
            .with_style(Self::spinner_style())
            .with_message("Connecting...");
        pb.set_draw_target(target);

        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(pb_guard) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::Connected { endpoint } => {
                    pb_guard.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    pb_guard.set_message(format!("Serving {}", endpoint));
                }
                Progress::FrameComputed { frame, energy } => {
                    pb_guard.set_position(frame);
                    pb_guard.set_message(format!("Frame {} computed, E = {:.8} Ha", frame, energy));
                }
                Progress::ForcesSent { frame } => {
                    pb_guard.set_message(format!("Frame {} delivered", frame));
                }
                Progress::Message(msg) => {
                    pb_guard.println(format!("  {}", msg));
                }
            }
        })
    }

    /// Stops the spinner and leaves `message` on screen.
    pub fn finish(&self, message: impl Into<String>) {
        if let Ok(pb) = self.pb.lock() {
            pb.disable_steady_tick();
            pb.finish_with_message(message.into());
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
