//! Reference data: breeds and colours.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Breed {
  pub id:         i32,
  pub name:       String,
  pub species_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Colour {
  pub id:   i32,
  pub name: String,
}

/// A bundle of reference rows, as loaded from a seed file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReferenceDataSet {
  #[serde(default)]
  pub breeds:  Vec<Breed>,
  #[serde(default)]
  pub colours: Vec<Colour>,
}

impl ReferenceDataSet {
  pub fn from_json(input: &str) -> crate::Result<Self> {
    Ok(serde_json::from_str(input)?)
  }
}
