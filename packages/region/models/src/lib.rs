#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Canonical region keys for joining outbreak datasets.
//!
//! Every dataset names its regions a little differently ("Gaines, TX",
//! "Gaines County", "gaines"). All of them are routed through
//! [`normalize`] exactly once, at load time, so the rest of the system
//! only ever compares [`RegionKey`] values.

pub mod jurisdiction;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Runs of whitespace inside an identifier.
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// One or more trailing `COUNTY` words (applied after upper-casing).
static COUNTY_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\s+COUNTY)+$").expect("valid regex"));

/// A canonical region identifier.
///
/// Two raw identifiers that denote the same region always normalize to
/// equal keys. Empty or missing identifiers become [`RegionKey::Invalid`]
/// instead of being dropped, so callers decide whether to show them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum RegionKey {
    /// Upper-case, whitespace-collapsed, unqualified region name.
    Canonical(String),
    /// The raw identifier was empty or missing.
    Invalid,
}

impl RegionKey {
    /// Returns the canonical string, or `""` for [`RegionKey::Invalid`].
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Canonical(key) => key,
            Self::Invalid => "",
        }
    }

    /// Whether this key names a real region.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Canonical(_))
    }
}

impl std::fmt::Display for RegionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Canonical(key) => f.write_str(key),
            Self::Invalid => f.write_str("<invalid>"),
        }
    }
}

impl From<String> for RegionKey {
    fn from(raw: String) -> Self {
        normalize(&raw)
    }
}

impl From<&str> for RegionKey {
    fn from(raw: &str) -> Self {
        normalize(raw)
    }
}

impl From<RegionKey> for String {
    fn from(key: RegionKey) -> Self {
        match key {
            RegionKey::Canonical(key) => key,
            RegionKey::Invalid => Self::new(),
        }
    }
}

/// Canonicalizes a raw region identifier.
///
/// The pipeline:
/// 1. Drop everything from the first comma on (`"Gaines, TX"` → `"Gaines"`)
/// 2. Trim and collapse internal whitespace
/// 3. Uppercase
/// 4. Strip trailing `COUNTY` words
///
/// The function is idempotent: normalizing [`RegionKey::as_str`] of a
/// result yields the same key.
#[must_use]
pub fn normalize(raw: &str) -> RegionKey {
    let unqualified = raw.split(',').next().unwrap_or_default();
    let collapsed = WHITESPACE_RE.replace_all(unqualified.trim(), " ");
    let upper = collapsed.to_uppercase();
    let stripped = COUNTY_SUFFIX_RE.replace(&upper, "");
    let key = stripped.trim();

    if key.is_empty() {
        RegionKey::Invalid
    } else {
        RegionKey::Canonical(key.to_string())
    }
}

/// Like [`normalize`], for identifiers that may be absent.
#[must_use]
pub fn normalize_optional(raw: Option<&str>) -> RegionKey {
    raw.map_or(RegionKey::Invalid, normalize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> RegionKey {
        RegionKey::Canonical(s.to_string())
    }

    #[test]
    fn strips_state_qualifier() {
        assert_eq!(normalize("Gaines, TX"), key("GAINES"));
        assert_eq!(normalize("Gaines, Texas, USA"), key("GAINES"));
    }

    #[test]
    fn unqualified_name_normalizes_to_itself() {
        assert_eq!(normalize("Gaines"), key("GAINES"));
        assert_eq!(normalize("  gaines  "), key("GAINES"));
    }

    #[test]
    fn equivalent_forms_share_a_key() {
        let forms = [
            "Gaines",
            "Gaines, TX",
            "GAINES",
            " gaines ,tx",
            "Gaines County",
            "Gaines County, TX",
            "gaines   county",
        ];
        for form in forms {
            assert_eq!(normalize(form), key("GAINES"), "form {form:?}");
        }
    }

    #[test]
    fn collapses_internal_whitespace() {
        assert_eq!(normalize("El   Paso"), key("EL PASO"));
        assert_eq!(normalize("El\tPaso, TX"), key("EL PASO"));
    }

    #[test]
    fn bare_county_word_is_kept() {
        assert_eq!(normalize("County"), key("COUNTY"));
    }

    #[test]
    fn empty_and_missing_identifiers_are_invalid() {
        assert_eq!(normalize(""), RegionKey::Invalid);
        assert_eq!(normalize("   "), RegionKey::Invalid);
        assert_eq!(normalize(", TX"), RegionKey::Invalid);
        assert_eq!(normalize_optional(None), RegionKey::Invalid);
        assert!(!RegionKey::Invalid.is_valid());
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in [
            "Gaines, TX",
            "Foo County County",
            "  lubbock ",
            "",
            "El  Paso County, TX",
            "Straße",
        ] {
            let once = normalize(raw);
            let twice = normalize(once.as_str());
            assert_eq!(once, twice, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn deserializing_normalizes() {
        let parsed: RegionKey = serde_json::from_str("\"Dawson County, TX\"").unwrap();
        assert_eq!(parsed, key("DAWSON"));
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"DAWSON\"");
    }
}
