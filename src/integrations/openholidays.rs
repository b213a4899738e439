//! Public holidays from <https://openholidaysapi.org>.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use super::{check_status, format_api_date, HolidaySource};
use crate::calendar::Holiday;
use crate::error::Result;
use crate::fields::Country;

pub const DEFAULT_BASE_URL: &str = "https://openholidaysapi.org";
const SERVICE: &str = "OpenHolidays";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublicHoliday {
    start_date: NaiveDate,
    end_date: NaiveDate,
    name: HolidayName,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HolidayName {
    Plain(String),
    Localized(Vec<LocalizedText>),
}

#[derive(Debug, Deserialize)]
struct LocalizedText {
    language: String,
    text: String,
}

impl HolidayName {
    /// English if available, otherwise whatever comes first.
    fn into_text(self) -> String {
        match self {
            HolidayName::Plain(s) => s,
            HolidayName::Localized(texts) => {
                let english = texts.iter().position(|t| t.language.eq_ignore_ascii_case("en"));
                texts
                    .into_iter()
                    .nth(english.unwrap_or(0))
                    .map(|t| t.text)
                    .unwrap_or_default()
            }
        }
    }
}

pub struct OpenHolidays {
    client: reqwest::Client,
    base_url: String,
}

impl OpenHolidays {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        OpenHolidays {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for OpenHolidays {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HolidaySource for OpenHolidays {
    async fn get_holidays(&self, country: Country, start: NaiveDate, end: NaiveDate) -> Result<Vec<Holiday>> {
        let (from, to) = (format_api_date(start), format_api_date(end));
        let response = self
            .client
            .get(format!("{}/PublicHolidays", self.base_url))
            .header("Accept", "application/json")
            .query(&[
                ("countryIsoCode", country.iso_code()),
                ("validFrom", from.as_str()),
                ("validTo", to.as_str()),
            ])
            .send()
            .await?;
        let response = check_status(SERVICE, response).await?;
        let entries: Vec<PublicHoliday> = response.json().await?;

        let holidays: Vec<Holiday> = entries
            .into_iter()
            .map(|h| Holiday {
                start_date: h.start_date,
                end_date: h.end_date,
                name: h.name.into_text(),
                country,
            })
            .collect();

        debug!(%country, count = holidays.len(), "fetched public holidays");
        Ok(holidays)
    }
}
