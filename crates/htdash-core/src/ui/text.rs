//! Text component for displaying single-line styled text

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, iso_8859_1};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Alignment, Baseline, Text as EgText, TextStyleBuilder};

use super::core::Drawable;
use super::styling::Style;

/// Longest text a component holds; longer text is truncated
pub const MAX_TEXT_LENGTH: usize = 64;

/// Text size variants
///
/// Fonts are Latin-1 so readouts can carry `°`:
/// - `Small`: 5x8
/// - `Medium`: 6x10 (default)
/// - `Large`: 10x20
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TextSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl TextSize {
    pub fn font(&self) -> &'static MonoFont<'static> {
        match self {
            TextSize::Small => &iso_8859_1::FONT_5X8,
            TextSize::Medium => &iso_8859_1::FONT_6X10,
            TextSize::Large => &iso_8859_1::FONT_10X20,
        }
    }

    /// Line height in pixels
    pub fn height(&self) -> u32 {
        self.font().character_size.height
    }
}

/// Single line of styled text
///
/// # Examples
/// ```ignore
/// let text = TextComponent::new(
///     Rectangle::new(Point::new(8, 8), Size::new(180, 20)),
///     "21.5°C",
///     TextSize::Large,
/// )
/// .with_alignment(Alignment::Right);
/// ```
pub struct TextComponent {
    bounds: Rectangle,
    text: heapless::String<MAX_TEXT_LENGTH>,
    size: TextSize,
    alignment: Alignment,
    style: Style,
    dirty: bool,
}

impl TextComponent {
    pub fn new(bounds: Rectangle, text: &str, size: TextSize) -> Self {
        Self {
            bounds,
            text: truncated(text),
            size,
            alignment: Alignment::Left,
            style: Style::default(),
            dirty: true,
        }
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Update the displayed text, marking the component dirty if it changed
    pub fn set_text(&mut self, text: &str) {
        let text = truncated(text);
        if self.text != text {
            self.text = text;
            self.dirty = true;
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_bounds(&mut self, bounds: Rectangle) {
        if self.bounds != bounds {
            self.bounds = bounds;
            self.dirty = true;
        }
    }

    fn text_position(&self) -> Point {
        let top = self.bounds.top_left.y + self.style.padding.top as i32;
        match self.alignment {
            Alignment::Left => Point::new(
                self.bounds.top_left.x + self.style.padding.left as i32,
                top,
            ),
            Alignment::Center => Point::new(self.bounds.center().x, top),
            Alignment::Right => Point::new(
                self.bounds.top_left.x + self.bounds.size.width as i32
                    - self.style.padding.right as i32
                    - 1,
                top,
            ),
        }
    }
}

/// Copy `text` into a bounded string, cutting at a char boundary
fn truncated(text: &str) -> heapless::String<MAX_TEXT_LENGTH> {
    let mut out = heapless::String::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

impl Drawable for TextComponent {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        let mut canvas = display.clipped(&self.bounds);

        if self.style.background_color.is_some() {
            self.bounds
                .into_styled(self.style.to_primitive_style())
                .draw(&mut canvas)?;
        }

        let text_color = self.style.foreground_color.unwrap_or(Rgb565::WHITE);
        let character_style = MonoTextStyle::new(self.size.font(), text_color);
        let text_style = TextStyleBuilder::new()
            .alignment(self.alignment)
            .baseline(Baseline::Top)
            .build();

        EgText::with_text_style(&self.text, self.text_position(), character_style, text_style)
            .draw(&mut canvas)?;

        Ok(())
    }

    fn bounds(&self) -> Rectangle {
        self.bounds
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::FrameBuffer;
    use crate::ui::styling::COLOR_FOREGROUND;

    fn bounds() -> Rectangle {
        Rectangle::new(Point::new(2, 2), Size::new(60, 12))
    }

    #[test]
    fn test_set_text_marks_dirty_only_on_change() {
        let mut text = TextComponent::new(bounds(), "21.5°C", TextSize::Medium);
        text.mark_clean();

        text.set_text("21.5°C");
        assert!(!text.is_dirty());

        text.set_text("21.6°C");
        assert!(text.is_dirty());
        assert_eq!(text.text(), "21.6°C");
    }

    #[test]
    fn test_long_text_is_truncated() {
        let long = "x".repeat(MAX_TEXT_LENGTH + 10);
        let text = TextComponent::new(bounds(), &long, TextSize::Small);
        assert_eq!(text.text().len(), MAX_TEXT_LENGTH);
    }

    #[test]
    fn test_draw_stays_inside_bounds() {
        let mut fb = FrameBuffer::new(Size::new(80, 20), Rgb565::BLACK);
        let mut text = TextComponent::new(bounds(), "Garden shed, far corner", TextSize::Medium)
            .with_style(Style::new().with_background(COLOR_FOREGROUND));

        assert!(text.draw_if_dirty(&mut fb).unwrap());
        assert!(!text.draw_if_dirty(&mut fb).unwrap());

        let dirty = fb.dirty_area().unwrap();
        assert_eq!(dirty, bounds());
    }
}
