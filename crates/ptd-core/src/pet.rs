//! Pets and the enumerations and sentinel ids that describe them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, FromRepr};
use uuid::Uuid;

use crate::{Error, Result, audit::Audit};

/// Breed id recorded when the pet is a mix of breeds.
pub const MIXED_BREED_ID: i32 = 99;
/// Breed id recorded when the breed is not known.
pub const UNKNOWN_BREED_ID: i32 = 100;

/// Colour ids whose meaning is "other"; these need a free-text colour.
pub const OTHER_COLOUR_IDS: [i32; 3] = [11, 20, 29];

/// True for the mixed/unknown breed sentinels, which are never looked up.
pub fn is_breed_sentinel(breed_id: i32) -> bool {
  breed_id == MIXED_BREED_ID || breed_id == UNKNOWN_BREED_ID
}

pub fn requires_other_colour(colour_id: i32) -> bool {
  OTHER_COLOUR_IDS.contains(&colour_id)
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, FromRepr,
)]
#[repr(i32)]
pub enum Species {
  Dog    = 1,
  Cat    = 2,
  Ferret = 3,
}

impl Species {
  pub fn id(self) -> i32 { self as i32 }

  pub fn try_from_id(id: i32) -> Result<Self> {
    Self::from_repr(id).ok_or(Error::UnknownSpecies(id))
  }

  /// Ferrets are the only species recorded without a breed.
  pub fn allows_missing_breed(self) -> bool { matches!(self, Self::Ferret) }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, FromRepr,
)]
#[repr(i32)]
pub enum Sex {
  Male   = 1,
  Female = 2,
}

impl Sex {
  pub fn id(self) -> i32 { self as i32 }

  pub fn try_from_id(id: i32) -> Result<Self> {
    Self::from_repr(id).ok_or(Error::UnknownSex(id))
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
  pub id:                                     Uuid,
  pub name:                                   String,
  pub species:                                Species,
  /// `None` only for ferrets.
  pub breed_id:                               Option<i32>,
  /// Present iff `breed_id` is a sentinel.
  pub additional_info_mixed_breed_or_unknown: Option<String>,
  pub sex:                                    Sex,
  pub date_of_birth:                          Option<DateTime<Utc>>,
  pub colour_id:                              i32,
  /// Present iff `colour_id` is one of [`OTHER_COLOUR_IDS`].
  pub other_colour:                           Option<String>,
  pub microchip_number:                       Option<String>,
  pub microchipped_date:                      Option<DateTime<Utc>>,
  pub has_unique_feature:                     bool,
  pub unique_feature_description:             Option<String>,
  pub audit:                                  Audit,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn species_ids_round_trip() {
    for species in [Species::Dog, Species::Cat, Species::Ferret] {
      assert_eq!(Species::try_from_id(species.id()).unwrap(), species);
    }
    assert!(matches!(Species::try_from_id(7), Err(Error::UnknownSpecies(7))));
  }

  #[test]
  fn only_ferrets_may_omit_breed() {
    assert!(Species::Ferret.allows_missing_breed());
    assert!(!Species::Dog.allows_missing_breed());
    assert!(!Species::Cat.allows_missing_breed());
  }

  #[test]
  fn sentinels_and_other_colours() {
    assert!(is_breed_sentinel(99));
    assert!(is_breed_sentinel(100));
    assert!(!is_breed_sentinel(98));
    assert!(requires_other_colour(11));
    assert!(requires_other_colour(29));
    assert!(!requires_other_colour(12));
  }
}
