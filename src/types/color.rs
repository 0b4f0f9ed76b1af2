//! Color records for columns and groups.
//!
//! Stored values come in two shapes: the current three-field record and a
//! legacy plain hex string. A legacy string deserializes by promoting the
//! string to all three sub-colors, so old data keeps loading without a
//! migration pass.

use serde::{Deserialize, Serialize};

/// Color record carried by columns and groups.
///
/// Hex values are stored without a leading `#`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityColor {
    pub column_color: String,
    pub item_color: String,
    pub button_color: String,
}

impl EntityColor {
    /// Build a record from three distinct sub-colors.
    pub fn new(
        column_color: impl Into<String>,
        item_color: impl Into<String>,
        button_color: impl Into<String>,
    ) -> Self {
        Self {
            column_color: column_color.into(),
            item_color: item_color.into(),
            button_color: button_color.into(),
        }
    }

    /// Promote a single hex color to all three sub-colors.
    pub fn uniform(hex: impl Into<String>) -> Self {
        let hex = hex.into();
        Self {
            column_color: hex.clone(),
            item_color: hex.clone(),
            button_color: hex,
        }
    }
}

/// Accepted stored shapes: record or legacy string.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Record {
        column_color: String,
        item_color: String,
        button_color: String,
    },
    Legacy(String),
}

impl<'de> Deserialize<'de> for EntityColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match ColorRepr::deserialize(deserializer)? {
            ColorRepr::Record {
                column_color,
                item_color,
                button_color,
            } => Ok(Self {
                column_color,
                item_color,
                button_color,
            }),
            ColorRepr::Legacy(hex) => Ok(Self::uniform(hex)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_roundtrip() {
        let color = EntityColor::new("1d76db", "0e8a16", "d73a4a");
        let json = serde_json::to_string(&color).unwrap();
        let back: EntityColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, color);
    }

    #[test]
    fn test_legacy_string_promotes_to_all_fields() {
        let color: EntityColor = serde_json::from_str("\"5319e7\"").unwrap();
        assert_eq!(color.column_color, "5319e7");
        assert_eq!(color.item_color, "5319e7");
        assert_eq!(color.button_color, "5319e7");
    }

    #[test]
    fn test_legacy_never_serialized_back_as_string() {
        let color: EntityColor = serde_json::from_str("\"5319e7\"").unwrap();
        let json = serde_json::to_value(&color).unwrap();
        assert!(json.is_object());
    }
}
