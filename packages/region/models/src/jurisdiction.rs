//! US state jurisdictions keyed by two-digit FIPS code.
//!
//! The boundary source tags every county polygon with its state's FIPS
//! code; the dashboard is pinned to one of these.

/// A US state (or DC) as identified by the boundary source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Jurisdiction {
    /// Two-digit FIPS code (e.g. `"48"`).
    pub fips: &'static str,
    /// Two-letter postal abbreviation (e.g. `"TX"`).
    pub abbr: &'static str,
    /// Full name (e.g. `"Texas"`).
    pub name: &'static str,
}

const fn j(fips: &'static str, abbr: &'static str, name: &'static str) -> Jurisdiction {
    Jurisdiction { fips, abbr, name }
}

/// The 50 states plus DC, ordered by FIPS code.
pub const JURISDICTIONS: &[Jurisdiction] = &[
    j("01", "AL", "Alabama"),
    j("02", "AK", "Alaska"),
    j("04", "AZ", "Arizona"),
    j("05", "AR", "Arkansas"),
    j("06", "CA", "California"),
    j("08", "CO", "Colorado"),
    j("09", "CT", "Connecticut"),
    j("10", "DE", "Delaware"),
    j("11", "DC", "District of Columbia"),
    j("12", "FL", "Florida"),
    j("13", "GA", "Georgia"),
    j("15", "HI", "Hawaii"),
    j("16", "ID", "Idaho"),
    j("17", "IL", "Illinois"),
    j("18", "IN", "Indiana"),
    j("19", "IA", "Iowa"),
    j("20", "KS", "Kansas"),
    j("21", "KY", "Kentucky"),
    j("22", "LA", "Louisiana"),
    j("23", "ME", "Maine"),
    j("24", "MD", "Maryland"),
    j("25", "MA", "Massachusetts"),
    j("26", "MI", "Michigan"),
    j("27", "MN", "Minnesota"),
    j("28", "MS", "Mississippi"),
    j("29", "MO", "Missouri"),
    j("30", "MT", "Montana"),
    j("31", "NE", "Nebraska"),
    j("32", "NV", "Nevada"),
    j("33", "NH", "New Hampshire"),
    j("34", "NJ", "New Jersey"),
    j("35", "NM", "New Mexico"),
    j("36", "NY", "New York"),
    j("37", "NC", "North Carolina"),
    j("38", "ND", "North Dakota"),
    j("39", "OH", "Ohio"),
    j("40", "OK", "Oklahoma"),
    j("41", "OR", "Oregon"),
    j("42", "PA", "Pennsylvania"),
    j("44", "RI", "Rhode Island"),
    j("45", "SC", "South Carolina"),
    j("46", "SD", "South Dakota"),
    j("47", "TN", "Tennessee"),
    j("48", "TX", "Texas"),
    j("49", "UT", "Utah"),
    j("50", "VT", "Vermont"),
    j("51", "VA", "Virginia"),
    j("53", "WA", "Washington"),
    j("54", "WV", "West Virginia"),
    j("55", "WI", "Wisconsin"),
    j("56", "WY", "Wyoming"),
];

/// Looks up a jurisdiction by its FIPS code.
#[must_use]
pub fn by_fips(fips: &str) -> Option<&'static Jurisdiction> {
    let fips = fips.trim();
    JURISDICTIONS.iter().find(|entry| entry.fips == fips)
}

/// Looks up a jurisdiction by postal abbreviation, case-insensitively.
#[must_use]
pub fn by_abbr(abbr: &str) -> Option<&'static Jurisdiction> {
    let abbr = abbr.trim();
    JURISDICTIONS
        .iter()
        .find(|entry| entry.abbr.eq_ignore_ascii_case(abbr))
}
