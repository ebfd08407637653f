//! Core interfaces and types shared by every widget.

pub mod component;
pub mod input;
pub mod input_event;
pub mod keybindings;
pub mod text;
