/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - Photo decoding for display (photo.rs)
/// - The form-and-list screen and its messages (screen.rs)

pub mod data;
pub mod photo;
pub mod screen;

pub use screen::{Effect, Message, Screen};
