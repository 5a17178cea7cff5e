//! Colors, palette and element styles
//!
//! Colors are RGB565. To convert from 8-bit RGB: R>>3, G>>2, B>>3.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::primitives::{PrimitiveStyle, PrimitiveStyleBuilder};

// ============================================================================
// Base Colors
// ============================================================================

/// Page background, very dark gray-blue
pub const COLOR_BACKGROUND: Rgb565 = Rgb565::new(18 >> 3, 23 >> 2, 24 >> 3);

/// Tile surface, slightly lighter than the background
pub const COLOR_FOREGROUND: Rgb565 = Rgb565::new(26 >> 3, 32 >> 2, 33 >> 3);

/// Tile outline
pub const COLOR_STROKE: Rgb565 = Rgb565::new(43 >> 3, 55 >> 2, 57 >> 3);

/// Temperature readout accent
pub const COLOR_TEMPERATURE: Rgb565 = Rgb565::new(230 >> 3, 150 >> 2, 90 >> 3);

/// Humidity readout accent
pub const COLOR_HUMIDITY: Rgb565 = Rgb565::new(95 >> 3, 170 >> 2, 220 >> 3);

pub const WHITE: Rgb565 = Rgb565::new(31, 63, 31);
pub const LIGHT_GRAY: Rgb565 = Rgb565::new(21, 42, 21);

/// Colors shared by every tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorPalette {
    pub background: Rgb565,
    /// Tile fill
    pub surface: Rgb565,
    pub border: Rgb565,
    pub text_primary: Rgb565,
    /// Clock label and other secondary text
    pub text_secondary: Rgb565,
    pub temperature: Rgb565,
    pub humidity: Rgb565,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::dark()
    }
}

impl ColorPalette {
    pub fn dark() -> Self {
        Self {
            background: COLOR_BACKGROUND,
            surface: COLOR_FOREGROUND,
            border: COLOR_STROKE,
            text_primary: WHITE,
            text_secondary: LIGHT_GRAY,
            temperature: COLOR_TEMPERATURE,
            humidity: COLOR_HUMIDITY,
        }
    }
}

/// Padding around an element's content
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Padding {
    pub const fn all(value: u32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

/// Visual style for a UI element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub background_color: Option<Rgb565>,
    pub foreground_color: Option<Rgb565>,
    pub border_color: Option<Rgb565>,
    /// Border width in pixels (0 = no border)
    pub border_width: u32,
    pub padding: Padding,
}

impl Default for Style {
    /// White text, no background or border
    fn default() -> Self {
        Self {
            background_color: None,
            foreground_color: Some(WHITE),
            border_color: None,
            border_width: 0,
            padding: Padding::default(),
        }
    }
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_background(mut self, color: Rgb565) -> Self {
        self.background_color = Some(color);
        self
    }

    pub fn with_foreground(mut self, color: Rgb565) -> Self {
        self.foreground_color = Some(color);
        self
    }

    /// A width of 0 disables the border
    pub fn with_border(mut self, color: Rgb565, width: u32) -> Self {
        self.border_color = Some(color);
        self.border_width = width;
        self
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    /// Converts this style to a `PrimitiveStyle` for filled and stroked shapes
    pub fn to_primitive_style(&self) -> PrimitiveStyle<Rgb565> {
        let mut builder = PrimitiveStyleBuilder::new();

        if let Some(bg) = self.background_color {
            builder = builder.fill_color(bg);
        }

        if let Some(border) = self.border_color
            && self.border_width > 0
        {
            builder = builder.stroke_color(border).stroke_width(self.border_width);
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::pixelcolor::RgbColor;

    #[test]
    fn test_style_without_border_has_no_stroke() {
        let style = Style::new().with_background(COLOR_FOREGROUND).with_border(COLOR_STROKE, 0);
        let primitive = style.to_primitive_style();
        assert_eq!(primitive.fill_color, Some(COLOR_FOREGROUND));
        assert_eq!(primitive.stroke_color, None);
    }

    #[test]
    fn test_style_with_border() {
        let primitive = Style::new()
            .with_border(Rgb565::RED, 2)
            .to_primitive_style();
        assert_eq!(primitive.stroke_color, Some(Rgb565::RED));
        assert_eq!(primitive.stroke_width, 2);
    }
}
