//! Field format checks.

use std::sync::LazyLock;

use regex::Regex;

/// `GB` + 8 digits, or the assisted-digital `GB826AD` + 4 hex digits. Only
/// the hex suffix is case-insensitive.
static REFERENCE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^GB(?:[0-9]{8}|826AD(?i:[0-9A-F]{4}))$").expect("valid regex")
});

/// IDCOMS re-check of [`REFERENCE_NUMBER`], spelled with explicit hex
/// classes: upper-case `GB` and `826AD`, hex suffix in either case.
static IDCOMS_REFERENCE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^GB(?:[0-9]{8}|826AD[0-9A-Fa-f]{4})$").expect("valid regex")
});

static UK_POSTCODE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)^[A-Z]{1,2}[0-9][A-Z0-9]? ?[0-9][A-Z]{2}$").expect("valid regex")
});

static PHONE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\+?[0-9\s-]{10,}$").expect("valid regex"));

static MICROCHIP: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[0-9]{15}$").expect("valid regex"));

static LOCAL_PART: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~.-]+$").expect("valid regex")
});

static DOMAIN: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*$")
    .expect("valid regex")
});

pub fn is_reference_number(value: &str) -> bool { REFERENCE_NUMBER.is_match(value) }

pub fn is_idcoms_reference_number(value: &str) -> bool {
  IDCOMS_REFERENCE_NUMBER.is_match(value)
}

pub fn is_uk_postcode(value: &str) -> bool { UK_POSTCODE.is_match(value) }

pub fn is_phone_number(value: &str) -> bool { PHONE.is_match(value) }

pub fn is_microchip_number(value: &str) -> bool { MICROCHIP.is_match(value) }

/// Whether `value` parses as a mailbox: either a bare `local@domain` or
/// `Display Name <local@domain>`. A trailing dot in the local part is
/// tolerated; redacted assisted-digital addresses can end that way.
pub fn is_mailbox(value: &str) -> bool {
  let value = value.trim();
  let addr = match (value.rfind('<'), value.strip_suffix('>')) {
    (Some(open), Some(inner)) => &inner[open + 1..],
    (None, None) => value,
    _ => return false,
  };

  let Some((local, domain)) = addr.rsplit_once('@') else {
    return false;
  };

  !local.starts_with('.')
    && !local.contains("..")
    && LOCAL_PART.is_match(local)
    && DOMAIN.is_match(domain)
}
