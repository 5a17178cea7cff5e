//! Small UI kit for the dashboard tiles
//!
//! This module provides:
//! - The [`Drawable`] trait with dirty tracking
//! - Colors, palette and per-element [`Style`]
//! - A text component that can render Latin-1 text such as `°C`

pub mod core;
pub mod styling;
pub mod text;

pub use self::core::Drawable;
pub use styling::{ColorPalette, Padding, Style};
pub use text::{TextComponent, TextSize};
