//! Enumerations and field types shared across the crate.
//!
//! This module defines the structured values that appear on employees and in
//! the command line: countries, export formats and email matching policies.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Countries we know how to fetch public holidays for.
///
/// Serialized as ISO 3166-1 alpha-2 codes. An employee whose country is not
/// listed here carries `None` and is treated as having no public holidays.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Country {
    #[serde(rename = "BR")]
    Brazil,
    #[serde(rename = "CA")]
    Canada,
    #[serde(rename = "FR")]
    France,
    #[serde(rename = "DE")]
    Germany,
    #[serde(rename = "IE")]
    Ireland,
    #[serde(rename = "NL")]
    Netherlands,
    #[serde(rename = "PL")]
    Poland,
    #[serde(rename = "PT")]
    Portugal,
    #[serde(rename = "ES")]
    Spain,
    #[serde(rename = "GB")]
    UnitedKingdom,
    #[serde(rename = "US")]
    UnitedStates,
}

impl Country {
    pub const ALL: [Country; 11] = [
        Country::Brazil,
        Country::Canada,
        Country::France,
        Country::Germany,
        Country::Ireland,
        Country::Netherlands,
        Country::Poland,
        Country::Portugal,
        Country::Spain,
        Country::UnitedKingdom,
        Country::UnitedStates,
    ];

    /// ISO 3166-1 alpha-2 code.
    pub fn iso_code(self) -> &'static str {
        match self {
            Country::Brazil => "BR",
            Country::Canada => "CA",
            Country::France => "FR",
            Country::Germany => "DE",
            Country::Ireland => "IE",
            Country::Netherlands => "NL",
            Country::Poland => "PL",
            Country::Portugal => "PT",
            Country::Spain => "ES",
            Country::UnitedKingdom => "GB",
            Country::UnitedStates => "US",
        }
    }

    /// English display name.
    pub fn name(self) -> &'static str {
        match self {
            Country::Brazil => "Brazil",
            Country::Canada => "Canada",
            Country::France => "France",
            Country::Germany => "Germany",
            Country::Ireland => "Ireland",
            Country::Netherlands => "Netherlands",
            Country::Poland => "Poland",
            Country::Portugal => "Portugal",
            Country::Spain => "Spain",
            Country::UnitedKingdom => "United Kingdom",
            Country::UnitedStates => "United States",
        }
    }

    /// Lenient parse from either an ISO code or an English country name, as
    /// HR systems tend to hand out free text.
    pub fn parse(s: &str) -> Option<Country> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        match s.to_lowercase().as_str() {
            "united states of america" | "usa" => return Some(Country::UnitedStates),
            "uk" | "great britain" | "england" => return Some(Country::UnitedKingdom),
            "the netherlands" | "holland" => return Some(Country::Netherlands),
            _ => {}
        }
        Country::ALL
            .into_iter()
            .find(|c| c.iso_code().eq_ignore_ascii_case(s) || c.name().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.iso_code())
    }
}

/// How statistics are rendered once computed.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Fixed-width table on stdout.
    #[default]
    Console,
    /// `employees.csv` and `tasks.csv` under `<out-dir>/csv/<work bucket id>/`.
    Csv,
    /// Pretty-printed JSON on stdout.
    Json,
}

/// Policy used to decide whether two emails belong to the same person.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum EmailMatching {
    /// Compare the part before `@`, ignoring the domain.
    #[default]
    IgnoreDomain,
    /// Same as `ignore-domain`, ASCII case-insensitive.
    IgnoreDomainCaseInsensitive,
    /// Whole address must be identical.
    Exact,
}
