//! Presentation options for the renderer.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use slint::Color;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid color {0:?}, expected #rgb, #rrggbb or #rrggbbaa")]
    InvalidColor(String),
    #[error("invalid render config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse a `#rgb`, `#rrggbb` or `#rrggbbaa` hex color.
pub fn parse_hex_color(s: &str) -> Result<Color, ConfigError> {
    let invalid = || ConfigError::InvalidColor(s.to_string());
    let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let digits =
        |i: usize, len: usize| u8::from_str_radix(&hex[i..i + len], 16).map_err(|_| invalid());
    let channel = |i: usize| digits(i, 2);
    match hex.len() {
        // #rgb expands each digit: f -> ff
        3 => Ok(Color::from_rgb_u8(digits(0, 1)? * 17, digits(1, 1)? * 17, digits(2, 1)? * 17)),
        6 => Ok(Color::from_rgb_u8(channel(0)?, channel(2)?, channel(4)?)),
        8 => Ok(Color::from_argb_u8(channel(6)?, channel(0)?, channel(2)?, channel(4)?)),
        _ => Err(invalid()),
    }
}

/// Format a color as `#rrggbb`, or `#rrggbbaa` when not opaque.
pub fn to_hex_color(color: Color) -> String {
    if color.alpha() == 255 {
        format!("#{:02x}{:02x}{:02x}", color.red(), color.green(), color.blue())
    } else {
        format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            color.red(),
            color.green(),
            color.blue(),
            color.alpha()
        )
    }
}

fn de_color<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
    let s = String::deserialize(deserializer)?;
    parse_hex_color(&s).map_err(serde::de::Error::custom)
}

fn ser_color<S: Serializer>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_hex_color(*color))
}

/// Renderer options.
///
/// Keys use camelCase in JSON (`gridSize`, `nodeBorderColor`, ...). Missing
/// keys keep their defaults:
///
/// ```
/// use slint_node_system::render::RenderConfig;
///
/// let json = r##"{ "gridSize": 32, "connectionColor": "#ff0000" }"##;
/// let config = RenderConfig::from_json(json).unwrap();
/// assert_eq!(config.grid_size, 32.0);
/// assert_eq!(config.font, "12px sans-serif");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    /// Grid spacing in world units.
    pub grid_size: f32,
    #[serde(serialize_with = "ser_color", deserialize_with = "de_color")]
    pub grid_color: Color,
    #[serde(serialize_with = "ser_color", deserialize_with = "de_color")]
    pub background_color: Color,
    #[serde(serialize_with = "ser_color", deserialize_with = "de_color")]
    pub node_background_color: Color,
    #[serde(serialize_with = "ser_color", deserialize_with = "de_color")]
    pub node_border_color: Color,
    #[serde(serialize_with = "ser_color", deserialize_with = "de_color")]
    pub node_header_color: Color,
    #[serde(serialize_with = "ser_color", deserialize_with = "de_color")]
    pub connection_color: Color,
    #[serde(serialize_with = "ser_color", deserialize_with = "de_color")]
    pub selection_color: Color,
    #[serde(serialize_with = "ser_color", deserialize_with = "de_color")]
    pub text_color: Color,
    #[serde(serialize_with = "ser_color", deserialize_with = "de_color")]
    pub input_port_color: Color,
    #[serde(serialize_with = "ser_color", deserialize_with = "de_color")]
    pub output_port_color: Color,
    /// Label font, CSS shorthand.
    pub font: String,
    /// Header height in world units.
    pub header_height: f32,
    /// Port circle radius in world units.
    pub port_radius: f32,
    /// Port label font size in world units.
    pub port_label_size: f32,
    /// Node outline width in pixels.
    pub node_border_width: f32,
    /// Connection width in world units.
    pub connection_width: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            grid_size: 20.0,
            grid_color: Color::from_rgb_u8(0xe0, 0xe0, 0xe0),
            background_color: Color::from_rgb_u8(0xf5, 0xf5, 0xf5),
            node_background_color: Color::from_rgb_u8(0xff, 0xff, 0xff),
            node_border_color: Color::from_rgb_u8(0xcc, 0xcc, 0xcc),
            node_header_color: Color::from_rgb_u8(0xf0, 0xf0, 0xf0),
            connection_color: Color::from_rgb_u8(0x66, 0x66, 0x66),
            selection_color: Color::from_rgb_u8(0x21, 0x96, 0xf3),
            text_color: Color::from_rgb_u8(0, 0, 0),
            input_port_color: Color::from_rgb_u8(0x4c, 0xaf, 0x50),
            output_port_color: Color::from_rgb_u8(0xff, 0x98, 0x00),
            font: "12px sans-serif".to_string(),
            header_height: 30.0,
            port_radius: 6.0,
            port_label_size: 10.0,
            node_border_width: 2.0,
            connection_width: 2.0,
        }
    }
}

impl RenderConfig {
    /// Parse a (possibly partial) JSON object over the defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a (possibly partial) JSON object over this config's values.
    ///
    /// On error `self` is not consulted further and nothing is changed.
    pub fn merged_from_json(&self, json: &str) -> Result<Self, ConfigError> {
        let overrides: serde_json::Map<String, Value> = serde_json::from_str(json)?;
        let mut merged = serde_json::to_value(self)?;
        if let Value::Object(base) = &mut merged {
            base.extend(overrides);
        }
        Ok(serde_json::from_value(merged)?)
    }
}
