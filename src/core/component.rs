//! Component and Focusable traits.

use crate::core::input_event::{EventDisposition, InputEvent};

/// Renderable component interface.
pub trait Component {
    /// Render to a list of lines at the given width.
    fn render(&mut self, width: usize) -> Vec<String>;

    /// Handle an input event.
    ///
    /// Returning [`EventDisposition::Handled`] tells the host to suppress its default
    /// action for the event (focus traversal on tab, focus loss on mouse press).
    fn handle_event(&mut self, _event: &InputEvent) -> EventDisposition {
        EventDisposition::Propagate
    }

    /// Invalidate any cached state.
    fn invalidate(&mut self) {}

    /// Optional focusable behavior.
    fn as_focusable(&mut self) -> Option<&mut dyn Focusable> {
        None
    }
}

/// Focusable behavior for components that track focus.
///
/// `set_focused(false)` is the blur notification: components that commit on blur
/// do so from there.
pub trait Focusable {
    fn set_focused(&mut self, focused: bool);
    fn is_focused(&self) -> bool;
}
