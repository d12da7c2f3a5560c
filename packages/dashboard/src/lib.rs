#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal front end for the outbreak map.
//!
//! Translates command-line flags into filter updates, asks the view
//! engine for the requested view, and prints it as JSON. All filtering
//! happens in `outbreak_map_view`.

pub mod config;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use outbreak_map_dataset::Registry;
use outbreak_map_dataset_models::VaccinationStatus;
use outbreak_map_view_models::{DateRange, FilterState, FilterUpdate, RankField, SortOrder};
use serde_json::{Value, json};

/// Command-line interface.
#[derive(Debug, Parser)]
#[command(name = "outbreak_map_dashboard", about = "Outbreak map dashboard views")]
pub struct Cli {
    /// Filter flags applied before deriving the view.
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Retry the boundary fetch once if it fails.
    #[arg(long, global = true)]
    pub retry_geography: bool,

    /// View to print.
    #[command(subcommand)]
    pub view: ViewCommand,
}

/// One flag per filter field.
#[derive(Debug, Default, Args)]
pub struct FilterArgs {
    /// Show only this region (any raw form, e.g. "Gaines County, TX").
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Minimum vaccination coverage, between 0 and 1.
    #[arg(long, global = true, value_parser = parse_rate)]
    pub min_rate: Option<f64>,

    /// Minimum case count.
    #[arg(long, global = true)]
    pub min_cases: Option<u64>,

    /// Show only regions with cases.
    #[arg(long, global = true)]
    pub cases_only: bool,

    /// First timeline date (YYYY-MM-DD).
    #[arg(long, global = true)]
    pub from: Option<NaiveDate>,

    /// Last timeline date (YYYY-MM-DD).
    #[arg(long, global = true)]
    pub to: Option<NaiveDate>,

    /// Age group label.
    #[arg(long, global = true)]
    pub age_group: Option<String>,

    /// School year for exemption views (defaults to the latest).
    #[arg(long, global = true)]
    pub school_year: Option<String>,

    /// Vaccination status: unvaccinated-or-unknown, one-dose or two-dose.
    #[arg(long, global = true)]
    pub status: Option<VaccinationStatus>,
}

impl FilterArgs {
    /// The filter updates these flags describe, in field order.
    #[must_use]
    pub fn updates(&self) -> Vec<FilterUpdate> {
        let mut updates = vec![];

        if let Some(region) = &self.region {
            updates.push(FilterUpdate::SelectedRegion(Some(region.as_str().into())));
        }
        if self.min_rate.is_some() {
            updates.push(FilterUpdate::MinVaccinationRate(self.min_rate));
        }
        if let Some(min_cases) = self.min_cases {
            updates.push(FilterUpdate::MinCases(min_cases));
        }
        if self.cases_only {
            updates.push(FilterUpdate::CasesOnly(true));
        }
        if self.from.is_some() || self.to.is_some() {
            updates.push(FilterUpdate::DateRange(Some(DateRange {
                start: self.from,
                end: self.to,
            })));
        }
        if self.age_group.is_some() {
            updates.push(FilterUpdate::AgeGroup(self.age_group.clone()));
        }
        if self.school_year.is_some() {
            updates.push(FilterUpdate::SchoolYear(self.school_year.clone()));
        }
        if self.status.is_some() {
            updates.push(FilterUpdate::VaccinationStatus(self.status));
        }

        updates
    }

    /// Default state with these flags applied.
    #[must_use]
    pub fn to_filter(&self) -> FilterState {
        FilterState::reset().update_all(self.updates())
    }
}

/// Views the dashboard can print.
#[derive(Debug, Clone, Subcommand)]
pub enum ViewCommand {
    /// Regions passing the filter
    Visible,
    /// Band legend
    Legend,
    /// Region picker options
    Regions,
    /// School years with exemption data
    SchoolYears,
    /// Case timelines on a shared date axis
    Timeline,
    /// Top regions by a field
    Ranking {
        /// How many regions to list.
        #[arg(short, default_value_t = 10)]
        n: usize,
        /// exemption-rate, vaccination-rate or cases.
        #[arg(long, default_value = "exemption-rate")]
        by: RankField,
        /// asc or desc.
        #[arg(long, default_value = "desc")]
        order: SortOrder,
    },
    /// Cases by age group
    Ages,
    /// Cases by vaccination status
    Status,
    /// Map features and bounds
    Map,
    /// Region under a point
    RegionAt {
        /// Longitude.
        #[arg(allow_negative_numbers = true)]
        lng: f64,
        /// Latitude.
        #[arg(allow_negative_numbers = true)]
        lat: f64,
    },
    /// Every view at once
    All,
}

/// Derives the requested view and serializes it.
///
/// # Errors
///
/// Returns [`serde_json::Error`] if a view fails to serialize.
pub fn snapshot(
    registry: &Registry,
    filter: &FilterState,
    view: &ViewCommand,
) -> Result<Value, serde_json::Error> {
    use outbreak_map_view as views;

    Ok(match view {
        ViewCommand::Visible => serde_json::to_value(views::visible_regions(registry, filter))?,
        ViewCommand::Legend => serde_json::to_value(views::legend())?,
        ViewCommand::Regions => serde_json::to_value(views::region_options(registry))?,
        ViewCommand::SchoolYears => {
            serde_json::to_value(views::available_school_years(registry))?
        }
        ViewCommand::Timeline => serde_json::to_value(views::joined_timeline(registry, filter))?,
        ViewCommand::Ranking { n, by, order } => {
            serde_json::to_value(views::top_ranked(registry, filter, *n, *by, *order))?
        }
        ViewCommand::Ages => serde_json::to_value(views::age_distribution(registry, filter))?,
        ViewCommand::Status => serde_json::to_value(views::vaccination_status(registry, filter))?,
        ViewCommand::Map => serde_json::to_value(views::map_layer(registry, filter))?,
        ViewCommand::RegionAt { lng, lat } => {
            serde_json::to_value(views::region_at(registry, *lng, *lat))?
        }
        ViewCommand::All => json!({
            "filter": filter,
            "statewideVaccinationRate": registry.datasets().statewide_vaccination_rate(),
            "visible": views::visible_regions(registry, filter),
            "legend": views::legend(),
            "timeline": views::joined_timeline(registry, filter),
            "ranking": views::top_ranked(
                registry,
                filter,
                10,
                RankField::ExemptionRate,
                SortOrder::Desc,
            ),
            "ages": views::age_distribution(registry, filter),
            "status": views::vaccination_status(registry, filter),
            "map": views::map_layer(registry, filter),
        }),
    })
}

fn parse_rate(value: &str) -> Result<f64, String> {
    let rate: f64 = value.parse().map_err(|e| format!("{value:?}: {e}"))?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(format!("{rate} is outside 0..=1"))
    }
}

#[cfg(test)]
mod tests {
    use outbreak_map_dataset::{Datasets, GeographyStatus};

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("outbreak_map_dashboard").chain(args.iter().copied()))
            .unwrap()
    }

    fn degraded_registry() -> Registry {
        Registry::new(
            Datasets::load_embedded().unwrap(),
            GeographyStatus::Unavailable {
                reason: "offline".to_string(),
            },
        )
    }

    #[test]
    fn no_flags_is_the_default_filter() {
        let cli = parse(&["visible"]);
        assert!(cli.filter.updates().is_empty());
        assert_eq!(cli.filter.to_filter(), FilterState::reset());
    }

    #[test]
    fn flags_map_onto_filter_fields() {
        let cli = parse(&[
            "ranking",
            "-n",
            "3",
            "--by",
            "cases",
            "--region",
            "Gaines County, TX",
            "--min-rate",
            "0.8",
            "--cases-only",
            "--from",
            "2025-02-01",
            "--status",
            "one-dose",
        ]);
        let filter = cli.filter.to_filter();

        assert_eq!(filter.selected_region.unwrap().as_str(), "GAINES");
        assert_eq!(filter.min_vaccination_rate, Some(0.8));
        assert!(filter.cases_only);
        assert_eq!(
            filter.date_range.and_then(|range| range.start),
            NaiveDate::from_ymd_opt(2025, 2, 1)
        );
        assert_eq!(filter.vaccination_status, Some(VaccinationStatus::OneDose));
        assert!(matches!(
            cli.view,
            ViewCommand::Ranking {
                n: 3,
                by: RankField::Cases,
                order: SortOrder::Desc
            }
        ));
    }

    #[test]
    fn out_of_range_rates_are_rejected() {
        assert!(
            Cli::try_parse_from(["outbreak_map_dashboard", "--min-rate", "1.5", "visible"])
                .is_err()
        );
    }

    #[test]
    fn region_at_accepts_negative_longitudes() {
        let cli = parse(&["region-at", "-102.6", "32.7"]);
        assert!(matches!(cli.view, ViewCommand::RegionAt { lat, .. } if (lat - 32.7).abs() < 1e-9));
    }

    #[test]
    fn degraded_snapshot_reports_map_unavailable() {
        let registry = degraded_registry();
        let filter = FilterState::reset();

        let map = snapshot(&registry, &filter, &ViewCommand::Map).unwrap();
        assert_eq!(map["status"], "unavailable");

        let all = snapshot(&registry, &filter, &ViewCommand::All).unwrap();
        assert!(all["visible"].as_array().is_some_and(|rows| !rows.is_empty()));
        assert_eq!(all["map"]["status"], "unavailable");
    }
}
