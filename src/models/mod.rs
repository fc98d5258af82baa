use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Voivodeship every trojmiasto.pl listing belongs to
pub const DEFAULT_VOIVODESHIP: &str = "pomorskie";

/// Amenities found in the "additional information" block of a listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Additional {
    pub balcony: bool,
    pub terrace: bool,
    pub garden: bool,
    pub basement: bool,
    pub elevator: bool,
    pub garage: bool,
    pub parking_space: bool,
    pub air_conditioning: bool,
    pub intercom: bool,
    pub monitoring: bool,
    /// Heating type; serialized as `false` when the listing does not say
    #[serde(with = "string_or_false", default)]
    pub heating: Option<String>,
}

mod string_or_false {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(heating) => serializer.serialize_str(heating),
            None => serializer.serialize_bool(false),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Heating {
            Name(String),
            Flag(bool),
        }

        Ok(match Option::<Heating>::deserialize(deserializer)? {
            Some(Heating::Name(name)) => Some(name),
            Some(Heating::Flag(_)) | None => None,
        })
    }
}

/// Normalized data of a single listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub title: String,
    pub offer_id: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub address: Option<String>,
    pub voivodeship: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    /// PLN
    pub price: Option<i64>,
    /// PLN
    pub deposit: Option<i64>,
    pub price_per_surface: Option<i64>,
    /// Square meters
    pub surface: Option<f64>,
    /// Ground floor is `0`
    pub floor: Option<i64>,
    pub floor_count: Option<i64>,
    pub rooms: Option<i64>,
    pub built_date: Option<i64>,
    pub available_from: Option<String>,
    /// `None` when the listing has no furniture field at all
    pub furniture: Option<bool>,
    pub additional: Additional,
    pub poster_name: Option<String>,
    pub date_added: Option<String>,
    pub date_updated: Option<String>,
    pub url: String,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub scraped_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heating_serializes_as_false_when_missing() {
        let additional = Additional {
            balcony: true,
            ..Default::default()
        };
        let json = serde_json::to_value(&additional).unwrap();
        assert_eq!(json["heating"], serde_json::json!(false));
        assert_eq!(json["balcony"], serde_json::json!(true));

        let additional = Additional {
            heating: Some("miejskie".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&additional).unwrap();
        assert_eq!(json["heating"], serde_json::json!("miejskie"));
    }

    #[test]
    fn heating_reads_back_false_as_missing() {
        let additional: Additional =
            serde_json::from_value(serde_json::json!({
                "balcony": false, "terrace": false, "garden": true, "basement": false,
                "elevator": false, "garage": false, "parking_space": false,
                "air_conditioning": false, "intercom": false, "monitoring": false,
                "heating": false
            }))
            .unwrap();
        assert!(additional.garden);
        assert_eq!(additional.heating, None);
    }
}
