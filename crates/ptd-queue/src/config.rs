//! Worker configuration, deserialised from TOML plus `PTD_*` overrides.

use std::{path::PathBuf, time::Duration};

use ptd_offline::ValidatorConfig;
use serde::Deserialize;

fn default_timeout_secs() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct WorkerConfig {
  pub store_path:              PathBuf,
  /// JSON `{ "Breeds": [...], "Colours": [...] }`, upserted at start-up.
  #[serde(default)]
  pub reference_data_path:     Option<PathBuf>,
  /// Append dead letters here; stderr when unset.
  #[serde(default)]
  pub dead_letter_path:        Option<PathBuf>,
  #[serde(default = "default_timeout_secs")]
  pub validation_timeout_secs: u64,
  #[serde(default = "default_timeout_secs")]
  pub lookup_timeout_secs:     u64,
}

impl WorkerConfig {
  pub fn validator_config(&self) -> ValidatorConfig {
    ValidatorConfig {
      overall_timeout: Duration::from_secs(self.validation_timeout_secs),
      lookup_timeout:  Duration::from_secs(self.lookup_timeout_secs),
    }
  }
}

#[cfg(test)]
mod tests {
  use ::config::{Config, File, FileFormat};

  use super::*;

  #[test]
  fn timeouts_default_to_thirty_seconds() {
    let cfg: WorkerConfig = Config::builder()
      .add_source(File::from_str(r#"store_path = "ptd.db""#, FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();

    assert_eq!(cfg.store_path, PathBuf::from("ptd.db"));
    assert_eq!(cfg.reference_data_path, None);
    assert_eq!(cfg.validator_config(), ValidatorConfig::default());
  }

  #[test]
  fn timeouts_can_be_overridden() {
    let toml = r#"
      store_path = "ptd.db"
      dead_letter_path = "dead.jsonl"
      validation_timeout_secs = 10
      lookup_timeout_secs = 4
    "#;
    let cfg: WorkerConfig = Config::builder()
      .add_source(File::from_str(toml, FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();

    assert_eq!(cfg.dead_letter_path, Some(PathBuf::from("dead.jsonl")));
    let validator = cfg.validator_config();
    assert_eq!(validator.overall_timeout, Duration::from_secs(10));
    assert_eq!(validator.lookup_timeout, Duration::from_secs(4));
  }
}
