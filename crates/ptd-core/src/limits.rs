//! Column length limits.
//!
//! The validator rejects raw input longer than these; the ingestion workflow
//! truncates to them before writing. Both read from here so the two can never
//! disagree. Lengths are counted in characters, not bytes.

pub const FULL_NAME_MAX:              usize = 300;
pub const FIRST_NAME_MAX:             usize = 100;
pub const LAST_NAME_MAX:              usize = 100;
pub const EMAIL_MAX:                  usize = 100;
pub const TELEPHONE_MAX:              usize = 50;

pub const ADDRESS_LINE_MAX:           usize = 250;
pub const TOWN_OR_CITY_MAX:           usize = 250;
pub const COUNTY_MAX:                 usize = 100;
pub const POST_CODE_MAX:              usize = 20;

pub const PET_NAME_MAX:               usize = 300;
/// IDCOMS lower bound for owner and pet names when they are supplied.
pub const NAME_MIN:                   usize = 2;
pub const MICROCHIP_NUMBER_MAX:       usize = 15;
pub const ADDITIONAL_INFO_MAX:        usize = 300;
pub const UNIQUE_FEATURE_MAX:         usize = 300;

pub const REFERENCE_NUMBER_MAX:       usize = 20;
pub const DOCUMENT_REFERENCE_MAX:     usize = 20;

// Storage-only limits: truncated on write, never validated.
pub const OTHER_COLOUR_MAX:           usize = 250;
pub const ROLE_MAX:                   usize = 50;

/// Number of characters in `value`.
pub fn char_len(value: &str) -> usize { value.chars().count() }

/// Cut `value` to at most `max` characters, respecting char boundaries.
pub fn truncate(value: &str, max: usize) -> String {
  match value.char_indices().nth(max) {
    Some((idx, _)) => value[..idx].to_owned(),
    None => value.to_owned(),
  }
}

/// [`truncate`] lifted over an optional column.
pub fn truncate_opt(value: Option<&str>, max: usize) -> Option<String> {
  value.map(|v| truncate(v, max))
}
