//! Editor appearance settings.

use peniko::Color;
use serde::{Deserialize, Serialize};

/// Serializable color (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Sizes and colors used to decorate edited elements.
///
/// Missing fields fall back to their defaults when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Annotation glyph size in pixels.
    pub annotation_size: f64,
    /// Size of the small annotation variant.
    pub small_annotation_size: f64,
    /// Stroke width of selection and preview outlines.
    pub outline_width: f64,
    pub selection_color: SerializableColor,
    /// Outline of highlighted, unselected elements.
    pub highlight_color: SerializableColor,
    /// Outline of a staged transform.
    pub preview_color: SerializableColor,
    /// Interior of selected annotations.
    pub annotation_fill: SerializableColor,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            annotation_size: 6.0,
            small_annotation_size: 4.0,
            outline_width: 1.0,
            selection_color: SerializableColor::rgb(59, 130, 246),
            highlight_color: SerializableColor::new(59, 130, 246, 128),
            preview_color: SerializableColor::rgb(100, 100, 100),
            annotation_fill: SerializableColor::white(),
        }
    }
}

impl EditorSettings {
    /// The glyph size for the regular or small annotation variant.
    pub fn annotation_size(&self, small: bool) -> f64 {
        if small {
            self.small_annotation_size
        } else {
            self.annotation_size
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = EditorSettings::default();
        assert_eq!(settings.annotation_size(false), 6.0);
        assert_eq!(settings.annotation_size(true), 4.0);
        assert_eq!(settings.annotation_fill, SerializableColor::white());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = EditorSettings::from_json(r#"{ "annotation_size": 10.0 }"#).unwrap();
        assert_eq!(settings.annotation_size, 10.0);
        assert_eq!(settings.small_annotation_size, 4.0);
        assert_eq!(settings.outline_width, 1.0);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut settings = EditorSettings::default();
        settings.preview_color = SerializableColor::new(1, 2, 3, 4);
        let json = settings.to_json().unwrap();
        assert_eq!(EditorSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_color_conversion() {
        let color: Color = SerializableColor::rgb(59, 130, 246).into();
        let back = SerializableColor::from(color);
        assert_eq!(back, SerializableColor::rgb(59, 130, 246));
    }
}
