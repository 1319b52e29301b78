use crate::{new_id, refreshed, require_name, ModelError, ModelResult};
use chrono::{DateTime, Utc};
use folio_common::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of narrative asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Character,
    Location,
    Item,
    Image,
}

impl AssetType {
    pub const ALL: [AssetType; 4] = [
        AssetType::Character,
        AssetType::Location,
        AssetType::Item,
        AssetType::Image,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Character => "character",
            AssetType::Location => "location",
            AssetType::Item => "item",
            AssetType::Image => "image",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ModelError::UnknownAssetType(s.to_string()))
    }
}

/// Open-ended asset payload
///
/// `imageUrl` is the only field the editor and portal understand; anything
/// else round-trips untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Reusable narrative entity referenced from page content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub data: AssetData,
}

impl Asset {
    pub fn new(name: &str, asset_type: AssetType, clock: &dyn Clock) -> ModelResult<Self> {
        Self::with_id(new_id(), name, asset_type, clock)
    }

    pub fn with_id(
        id: impl Into<String>,
        name: &str,
        asset_type: AssetType,
        clock: &dyn Clock,
    ) -> ModelResult<Self> {
        let name = require_name("Asset", name)?;
        let now = clock.now();
        Ok(Self {
            id: id.into(),
            created_at: now,
            updated_at: now,
            asset_type,
            name,
            description: String::new(),
            data: AssetData::default(),
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.data.image_url = Some(url.into());
        self
    }

    pub fn touch(&mut self, clock: &dyn Clock) {
        self.updated_at = refreshed(self.updated_at, clock);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_common::ManualClock;

    #[test]
    fn test_asset_type_parsing() {
        assert_eq!("character".parse::<AssetType>().unwrap(), AssetType::Character);
        assert_eq!("image".parse::<AssetType>().unwrap(), AssetType::Image);

        let err = "widget".parse::<AssetType>().unwrap_err();
        assert!(err.to_string().contains("widget"));
    }

    #[test]
    fn test_asset_wire_format_uses_type_key() {
        let clock = ManualClock::default();
        let asset = Asset::with_id("asset-1", "Kael", AssetType::Character, &clock)
            .unwrap()
            .with_description("A grizzled cyber-detective");

        let json = serde_json::to_value(&asset).unwrap();
        assert_eq!(json["type"], "character");
        assert_eq!(json["name"], "Kael");
        assert_eq!(json["data"], serde_json::json!({}));
    }

    #[test]
    fn test_asset_data_keeps_unknown_fields() {
        let json = serde_json::json!({
            "imageUrl": "data:image/jpeg;base64,AAAA",
            "age": 42,
            "aliases": ["K"]
        });

        let data: AssetData = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(data.image_url.as_deref(), Some("data:image/jpeg;base64,AAAA"));
        assert_eq!(data.extra.len(), 2);
        assert_eq!(serde_json::to_value(&data).unwrap(), json);
    }

    #[test]
    fn test_empty_asset_name_rejected() {
        let clock = ManualClock::default();
        assert!(Asset::new(" ", AssetType::Item, &clock).is_err());
    }
}
