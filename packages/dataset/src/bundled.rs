//! Bundled datasets embedded at compile time.
//!
//! Each dataset is a JSON document under `data/`, baked into the binary
//! via [`include_str!`]. Parsing routes every region identifier through
//! [`outbreak_map_region_models::normalize`] exactly once; nothing past
//! this module ever sees a raw identifier.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use outbreak_map_dataset_models::{
    AgeBucket, CaseRecord, ExemptionRecord, Observation, TimelineRecord, VaccinationRate,
    VaccinationRecord, VaccinationStatusSummary,
};
use outbreak_map_region_models::{RegionKey, normalize_optional};
use serde::Deserialize;

use crate::LoadError;

const VACCINATION: &str = "vaccination";
const CASES: &str = "cases";
const EXEMPTIONS: &str = "exemptions";
const AGE_BUCKETS: &str = "age buckets";
const VACCINATION_STATUS: &str = "vaccination status";
const TIMELINES: &str = "timelines";

/// Field naming the region in every region-keyed record.
const REGION_FIELD: &str = "county";

/// Canonical key of the jurisdiction-wide aggregate row in the
/// vaccination dataset.
const STATEWIDE_KEY: &str = "STATE";

/// Date formats accepted in timeline observations, each with the number
/// of digits its year field must have. chrono's `%Y` also accepts two
/// digits, so the width picks the format.
const DATE_FORMATS: &[(&str, usize)] = &[("%Y-%m-%d", 4), ("%m/%d/%Y", 4), ("%m/%d/%y", 2)];

/// Raw JSON for each bundled dataset.
#[derive(Debug, Clone, Copy)]
pub struct BundledSources<'a> {
    /// Vaccination coverage; the first record is a header row.
    pub vaccination: &'a str,
    /// Cumulative cases per region.
    pub cases: &'a str,
    /// Exemption rates per region and school year.
    pub exemptions: &'a str,
    /// Cases per age group.
    pub age_buckets: &'a str,
    /// Cases per vaccination status.
    pub vaccination_status: &'a str,
    /// Dated case observations per region.
    pub timelines: &'a str,
}

impl BundledSources<'static> {
    /// The datasets embedded in this build.
    #[must_use]
    pub const fn embedded() -> Self {
        Self {
            vaccination: include_str!("../data/vaccination_rates.json"),
            cases: include_str!("../data/case_counts.json"),
            exemptions: include_str!("../data/exemption_rates.json"),
            age_buckets: include_str!("../data/age_buckets.json"),
            vaccination_status: include_str!("../data/vaccination_status.json"),
            timelines: include_str!("../data/case_timelines.json"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawVaccinationRow {
    county: Option<String>,
    #[serde(default)]
    percentage: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct RawCaseRow {
    county: Option<String>,
    cases: u64,
}

#[derive(Debug, Deserialize)]
struct RawAgeRow {
    age: String,
    cases: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVaccinationStatus {
    not_vaccinated_unknown: u64,
    vaccinated1_dose: u64,
    vaccinated2_dose: u64,
}

#[derive(Debug, Deserialize)]
struct RawTimelineRow {
    county: Option<String>,
    cases: Vec<RawTimelinePoint>,
}

#[derive(Debug, Deserialize)]
struct RawTimelinePoint {
    date: String,
    #[serde(rename = "case")]
    count: u64,
}

/// A bundled record whose region identifier normalized to
/// [`RegionKey::Invalid`]. Kept so the failure stays visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRecord {
    /// Dataset the record came from.
    pub dataset: &'static str,
    /// Zero-based position of the record in its dataset.
    pub index: usize,
}

/// Every bundled dataset, keyed by canonical region.
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    entities: Vec<RegionKey>,
    names: BTreeMap<RegionKey, String>,
    vaccination: BTreeMap<RegionKey, VaccinationRecord>,
    statewide_vaccination: Option<VaccinationRate>,
    cases: BTreeMap<RegionKey, CaseRecord>,
    exemptions: Vec<ExemptionRecord>,
    school_years: Vec<String>,
    timelines: Vec<TimelineRecord>,
    age_buckets: Vec<AgeBucket>,
    vaccination_status: VaccinationStatusSummary,
    invalid_records: Vec<InvalidRecord>,
}

impl Datasets {
    /// Parses the datasets embedded in this build.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if any embedded dataset is malformed.
    pub fn load_embedded() -> Result<Self, LoadError> {
        Self::parse(&BundledSources::embedded())
    }

    /// Parses a full set of bundled sources.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if any dataset is not valid JSON for its
    /// schema, repeats a region, or carries unusable values.
    pub fn parse(sources: &BundledSources<'_>) -> Result<Self, LoadError> {
        let mut datasets = Self::default();

        datasets.parse_vaccination(sources.vaccination)?;
        datasets.parse_cases(sources.cases)?;
        datasets.parse_exemptions(sources.exemptions)?;
        datasets.parse_timelines(sources.timelines)?;

        datasets.age_buckets = from_json::<Vec<RawAgeRow>>(AGE_BUCKETS, sources.age_buckets)?
            .into_iter()
            .map(|row| AgeBucket {
                label: row.age.trim().to_string(),
                cases: row.cases,
            })
            .collect();
        log::info!("{AGE_BUCKETS}: loaded {} buckets", datasets.age_buckets.len());

        let status: RawVaccinationStatus =
            from_json(VACCINATION_STATUS, sources.vaccination_status)?;
        datasets.vaccination_status = VaccinationStatusSummary {
            unvaccinated_or_unknown: status.not_vaccinated_unknown,
            one_dose: status.vaccinated1_dose,
            two_dose: status.vaccinated2_dose,
        };

        log::info!(
            "Loaded bundled datasets: {} regions, {} invalid records",
            datasets.entities.len(),
            datasets.invalid_records.len()
        );

        Ok(datasets)
    }

    /// Regions in registry order: first appearance across vaccination,
    /// cases, exemptions, then timelines.
    #[must_use]
    pub fn entities(&self) -> &[RegionKey] {
        &self.entities
    }

    /// Display name for a region, if any dataset mentions it.
    #[must_use]
    pub fn display_name(&self, key: &RegionKey) -> Option<&str> {
        self.names.get(key).map(String::as_str)
    }

    /// Vaccination coverage; regions absent from the dataset are unknown.
    #[must_use]
    pub fn vaccination_rate(&self, key: &RegionKey) -> VaccinationRate {
        self.vaccination
            .get(key)
            .map_or(VaccinationRate::Unknown, |record| record.rate)
    }

    /// All vaccination records, keyed by region.
    #[must_use]
    pub const fn vaccination(&self) -> &BTreeMap<RegionKey, VaccinationRecord> {
        &self.vaccination
    }

    /// Coverage for the jurisdiction as a whole, if the dataset has an
    /// aggregate row.
    #[must_use]
    pub const fn statewide_vaccination_rate(&self) -> Option<VaccinationRate> {
        self.statewide_vaccination
    }

    /// Case count; regions absent from the dataset have zero cases.
    #[must_use]
    pub fn case_count(&self, key: &RegionKey) -> u64 {
        self.cases.get(key).map_or(0, |record| record.cases)
    }

    /// All case records, keyed by region.
    #[must_use]
    pub const fn cases(&self) -> &BTreeMap<RegionKey, CaseRecord> {
        &self.cases
    }

    /// Exemption records in dataset order.
    #[must_use]
    pub fn exemptions(&self) -> &[ExemptionRecord] {
        &self.exemptions
    }

    /// Exemption record for a region.
    #[must_use]
    pub fn exemption(&self, key: &RegionKey) -> Option<&ExemptionRecord> {
        self.exemptions.iter().find(|record| &record.key == key)
    }

    /// School years reported by the exemption dataset, read from the keys
    /// of its first record.
    #[must_use]
    pub fn school_years(&self) -> &[String] {
        &self.school_years
    }

    /// The most recent school year, if any.
    #[must_use]
    pub fn latest_school_year(&self) -> Option<&str> {
        self.school_years.last().map(String::as_str)
    }

    /// Timelines in dataset order, one per region.
    #[must_use]
    pub fn timelines(&self) -> &[TimelineRecord] {
        &self.timelines
    }

    /// Case counts per age group.
    #[must_use]
    pub fn age_buckets(&self) -> &[AgeBucket] {
        &self.age_buckets
    }

    /// Cases per vaccination status.
    #[must_use]
    pub const fn vaccination_status(&self) -> VaccinationStatusSummary {
        self.vaccination_status
    }

    /// Records dropped from joins because their identifier was empty.
    #[must_use]
    pub fn invalid_records(&self) -> &[InvalidRecord] {
        &self.invalid_records
    }

    /// Registers a key in registry order and remembers its display name.
    fn register(&mut self, key: &RegionKey, raw: Option<&str>) {
        if !self.names.contains_key(key) {
            self.entities.push(key.clone());
            self.names.insert(key.clone(), display_name(raw));
        }
    }

    /// Normalizes a raw identifier, recording it if invalid.
    fn key_for(&mut self, dataset: &'static str, index: usize, raw: Option<&str>) -> RegionKey {
        let key = normalize_optional(raw);
        if !key.is_valid() {
            log::warn!("{dataset}: record {index} has no usable region identifier ({raw:?})");
            self.invalid_records.push(InvalidRecord { dataset, index });
        }
        key
    }

    /// The vaccination dataset always starts with a header row (the
    /// column captions of the source spreadsheet). It is skipped by
    /// position; nothing confirms it is really a header.
    fn parse_vaccination(&mut self, json: &str) -> Result<(), LoadError> {
        let rows: Vec<RawVaccinationRow> = from_json(VACCINATION, json)?;

        let Some((header, rows)) = rows.split_first() else {
            return Err(malformed(VACCINATION, "missing header row"));
        };
        if header.percentage.is_number() {
            log::warn!(
                "{VACCINATION}: discarding first record {:?} as a header, but it looks like data",
                header.county
            );
        }

        for (offset, row) in rows.iter().enumerate() {
            let index = offset + 1;
            let key = self.key_for(VACCINATION, index, row.county.as_deref());
            if !key.is_valid() {
                continue;
            }

            let rate = parse_percentage(&row.percentage).ok_or_else(|| {
                malformed(
                    VACCINATION,
                    format!("record {index} has a non-numeric percentage {}", row.percentage),
                )
            })?;

            if key.as_str() == STATEWIDE_KEY {
                self.statewide_vaccination = Some(rate);
                continue;
            }
            if self.vaccination.contains_key(&key) {
                return Err(malformed(VACCINATION, format!("duplicate region {key}")));
            }

            self.register(&key, row.county.as_deref());
            self.vaccination.insert(
                key.clone(),
                VaccinationRecord {
                    name: display_name(row.county.as_deref()),
                    key,
                    rate,
                },
            );
        }

        log::info!("{VACCINATION}: loaded {} regions", self.vaccination.len());
        Ok(())
    }

    fn parse_cases(&mut self, json: &str) -> Result<(), LoadError> {
        let rows: Vec<RawCaseRow> = from_json(CASES, json)?;

        for (index, row) in rows.into_iter().enumerate() {
            let key = self.key_for(CASES, index, row.county.as_deref());
            if !key.is_valid() {
                continue;
            }
            if self.cases.contains_key(&key) {
                return Err(malformed(CASES, format!("duplicate region {key}")));
            }

            self.register(&key, row.county.as_deref());
            self.cases.insert(
                key.clone(),
                CaseRecord {
                    name: display_name(row.county.as_deref()),
                    key,
                    cases: row.cases,
                },
            );
        }

        log::info!("{CASES}: loaded {} regions", self.cases.len());
        Ok(())
    }

    /// Exemption records carry one numeric field per school year next to
    /// the region field, so they are read as plain JSON objects.
    fn parse_exemptions(&mut self, json: &str) -> Result<(), LoadError> {
        let rows: Vec<serde_json::Map<String, serde_json::Value>> = from_json(EXEMPTIONS, json)?;

        self.school_years = rows
            .first()
            .map(|first| {
                first
                    .keys()
                    .filter(|field| is_school_year(field))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        for (index, row) in rows.into_iter().enumerate() {
            let raw = row.get(REGION_FIELD).and_then(serde_json::Value::as_str);
            let key = self.key_for(EXEMPTIONS, index, raw);
            if !key.is_valid() {
                continue;
            }
            if self.exemptions.iter().any(|record| record.key == key) {
                return Err(malformed(EXEMPTIONS, format!("duplicate region {key}")));
            }

            let mut rates = BTreeMap::new();
            for (field, value) in row.iter().filter(|(field, _)| is_school_year(field)) {
                match parse_percentage(value) {
                    Some(VaccinationRate::Known(rate)) => {
                        rates.insert(field.clone(), rate);
                    }
                    Some(VaccinationRate::Unknown) => {}
                    None => {
                        return Err(malformed(
                            EXEMPTIONS,
                            format!("record {index} has a non-numeric rate for {field}: {value}"),
                        ));
                    }
                }
            }

            self.register(&key, raw);
            self.exemptions.push(ExemptionRecord {
                name: display_name(raw),
                key,
                rates,
            });
        }

        log::info!(
            "{EXEMPTIONS}: loaded {} regions across {} school years",
            self.exemptions.len(),
            self.school_years.len()
        );
        Ok(())
    }

    /// Timelines for the same region (e.g. listed once as "Gaines" and
    /// once as "Gaines, TX") are merged into one series.
    fn parse_timelines(&mut self, json: &str) -> Result<(), LoadError> {
        let rows: Vec<RawTimelineRow> = from_json(TIMELINES, json)?;

        for (index, row) in rows.into_iter().enumerate() {
            let key = self.key_for(TIMELINES, index, row.county.as_deref());
            if !key.is_valid() {
                continue;
            }

            let observations = row
                .cases
                .iter()
                .map(|point| {
                    parse_date(&point.date)
                        .map(|date| Observation {
                            date,
                            cases: point.count,
                        })
                        .ok_or_else(|| {
                            malformed(
                                TIMELINES,
                                format!("record {index} has an unparseable date {:?}", point.date),
                            )
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            self.register(&key, row.county.as_deref());
            if let Some(existing) = self.timelines.iter_mut().find(|record| record.key == key) {
                log::debug!("{TIMELINES}: merging repeated series for {key}");
                existing.observations.extend(observations);
            } else {
                self.timelines.push(TimelineRecord {
                    name: display_name(row.county.as_deref()),
                    key,
                    observations,
                });
            }
        }

        log::info!("{TIMELINES}: loaded {} regions", self.timelines.len());
        Ok(())
    }
}

fn from_json<T: serde::de::DeserializeOwned>(
    dataset: &'static str,
    json: &str,
) -> Result<T, LoadError> {
    serde_json::from_str(json).map_err(|source| LoadError::Json { dataset, source })
}

fn malformed(dataset: &'static str, message: impl Into<String>) -> LoadError {
    LoadError::Malformed {
        dataset,
        message: message.into(),
    }
}

/// Display form of a raw identifier: the unqualified, trimmed name
/// without a trailing "County".
fn display_name(raw: Option<&str>) -> String {
    const COUNTY_SUFFIX: &str = " county";

    let name = raw
        .and_then(|raw| raw.split(',').next())
        .unwrap_or_default()
        .trim();

    name.len()
        .checked_sub(COUNTY_SUFFIX.len())
        .filter(|&at| {
            name.get(at..)
                .is_some_and(|tail| tail.eq_ignore_ascii_case(COUNTY_SUFFIX))
        })
        .map_or(name, |at| name[..at].trim_end())
        .to_string()
}

/// School-year fields start with a four-digit year (`"2023-2024"`).
fn is_school_year(field: &str) -> bool {
    field != REGION_FIELD
        && field.len() >= 4
        && field.chars().take(4).all(|c| c.is_ascii_digit())
}

/// Reads a rate that may be a number, a numeric string, or a blank.
///
/// Returns `None` for values that are present but not numeric.
fn parse_percentage(value: &serde_json::Value) -> Option<VaccinationRate> {
    match value {
        serde_json::Value::Null => Some(VaccinationRate::Unknown),
        serde_json::Value::Number(number) => number.as_f64().map(VaccinationRate::Known),
        serde_json::Value::String(text) => {
            let text = text.trim();
            if text.is_empty() || text.eq_ignore_ascii_case("n/a") || text == "*" {
                Some(VaccinationRate::Unknown)
            } else {
                text.parse().ok().map(VaccinationRate::Known)
            }
        }
        _ => None,
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let year_width = year_field(text).len();

    DATE_FORMATS
        .iter()
        .filter(|(_, width)| *width == year_width)
        .find_map(|(format, _)| NaiveDate::parse_from_str(text, format).ok())
}

/// The year part of a date: last for `m/d/y`, first for `y-m-d`.
fn year_field(text: &str) -> &str {
    if text.contains('/') {
        text.rsplit('/').next().unwrap_or_default()
    } else {
        text.split('-').next().unwrap_or_default()
    }
}
