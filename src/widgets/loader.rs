//! Loading indicator shown while a search is in flight.

use crate::core::component::Component;
use crate::core::text::truncate_to_width;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Spinner plus message. The frame advances once per render, so the host's
/// redraw cadence is the animation clock.
pub struct LoadingIndicator {
    spinner_color_fn: Box<dyn Fn(&str) -> String>,
    message_color_fn: Box<dyn Fn(&str) -> String>,
    message: String,
    frame: usize,
}

impl LoadingIndicator {
    pub fn new(
        spinner_color_fn: Box<dyn Fn(&str) -> String>,
        message_color_fn: Box<dyn Fn(&str) -> String>,
        message: Option<String>,
    ) -> Self {
        Self {
            spinner_color_fn,
            message_color_fn,
            message: message.unwrap_or_else(|| "Loading...".to_string()),
            frame: 0,
        }
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub fn reset(&mut self) {
        self.frame = 0;
    }
}

impl Default for LoadingIndicator {
    fn default() -> Self {
        Self::new(Box::new(str::to_string), Box::new(str::to_string), None)
    }
}

impl Component for LoadingIndicator {
    fn render(&mut self, width: usize) -> Vec<String> {
        let spinner = (self.spinner_color_fn)(SPINNER_FRAMES[self.frame % SPINNER_FRAMES.len()]);
        let message = (self.message_color_fn)(&self.message);
        self.frame = self.frame.wrapping_add(1);
        vec![truncate_to_width(&format!("{spinner} {message}"), width, "", true)]
    }

    fn invalidate(&mut self) {
        self.reset();
    }
}
