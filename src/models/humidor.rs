//! Humidor inventory records

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A named collection of cigar inventory items owned by a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Humidor {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Target relative humidity in percent
    #[serde(default)]
    pub target_humidity: Option<u8>,
    #[serde(default)]
    pub cigar_count: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewHumidor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_humidity: Option<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HumidorUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_humidity: Option<u8>,
}

/// Strength classification printed on most cigar bands and catalogs
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    Mild,
    MildMedium,
    Medium,
    MediumFull,
    Full,
}

impl Strength {
    pub fn all() -> &'static [Strength] {
        &[
            Strength::Mild,
            Strength::MildMedium,
            Strength::Medium,
            Strength::MediumFull,
            Strength::Full,
        ]
    }
}

impl std::fmt::Display for Strength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strength::Mild => write!(f, "mild"),
            Strength::MildMedium => write!(f, "mild_medium"),
            Strength::Medium => write!(f, "medium"),
            Strength::MediumFull => write!(f, "medium_full"),
            Strength::Full => write!(f, "full"),
        }
    }
}

impl std::str::FromStr for Strength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "mild" => Ok(Strength::Mild),
            "mild_medium" => Ok(Strength::MildMedium),
            "medium" => Ok(Strength::Medium),
            "medium_full" => Ok(Strength::MediumFull),
            "full" => Ok(Strength::Full),
            other => Err(format!("unknown strength: {}", other)),
        }
    }
}

/// One inventory line in a humidor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cigar {
    pub id: String,
    pub humidor_id: String,
    pub brand: String,
    pub name: String,
    #[serde(default)]
    pub vitola: Option<String>,
    #[serde(default)]
    pub wrapper: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub strength: Option<Strength>,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub price_cents: Option<u32>,
    #[serde(default)]
    pub acquired_on: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Cigar {
    /// "Brand Name (Vitola)" as shown in listings
    pub fn label(&self) -> String {
        match &self.vitola {
            Some(v) => format!("{} {} ({})", self.brand, self.name, v),
            None => format!("{} {}", self.brand, self.name),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCigar {
    pub brand: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vitola: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrapper: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<Strength>,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_cents: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acquired_on: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CigarUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_cents: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidor_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strength_parse_variants() {
        assert_eq!("Medium-Full".parse::<Strength>().unwrap(), Strength::MediumFull);
        assert_eq!("mild medium".parse::<Strength>().unwrap(), Strength::MildMedium);
        assert!("strong".parse::<Strength>().is_err());
    }

    #[test]
    fn test_strength_serde_matches_display() {
        for strength in Strength::all() {
            let json = serde_json::to_string(strength).unwrap();
            assert_eq!(json, format!("\"{}\"", strength));
        }
    }

    #[test]
    fn test_cigar_label() {
        let mut cigar = Cigar {
            id: "c1".to_string(),
            humidor_id: "h1".to_string(),
            brand: "Arturo Fuente".to_string(),
            name: "Hemingway".to_string(),
            vitola: Some("Short Story".to_string()),
            wrapper: None,
            origin: None,
            strength: None,
            quantity: 3,
            price_cents: None,
            acquired_on: None,
            notes: None,
            image_url: None,
        };
        assert_eq!(cigar.label(), "Arturo Fuente Hemingway (Short Story)");
        cigar.vitola = None;
        assert_eq!(cigar.label(), "Arturo Fuente Hemingway");
    }
}
