//! User Interface layer for debugmate
//!
//! - Light/dark theme definitions
//! - Reusable widgets
//! - Main render function over the view model

pub mod render;
pub mod theme;
pub mod widgets;

pub use render::render;
pub use theme::Theme;
