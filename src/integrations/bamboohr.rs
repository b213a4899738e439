//! BambooHR as both employee directory and time-off source.
//!
//! BambooHR has no search-by-email endpoint, so the directory lists every
//! user, keeps the ones whose email matches a requested address and then
//! fetches each matching employee record.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{check_status, format_api_date, EmployeeDirectory, TimeOffSource};
use crate::email::{EmailSet, SharedMatcher};
use crate::employee::{Employee, TimeOff};
use crate::error::Result;
use crate::fields::Country;

const SERVICE: &str = "BambooHR";
const TIMEOUT: Duration = Duration::from_secs(30);
/// BambooHR ignores the password for API key authentication.
const PASSWORD: &str = "x";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct User {
    #[serde(default)]
    email: Option<String>,
    #[serde(default, deserialize_with = "id_string")]
    employee_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmployeeRecord {
    #[serde(deserialize_with = "id_string_required")]
    id: String,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    work_email: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

impl EmployeeRecord {
    fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimeOffRequest {
    #[serde(deserialize_with = "id_string_required")]
    employee_id: String,
    /// `{"2024-01-02": "1", "2024-01-03": "0.5"}`
    #[serde(default)]
    dates: BTreeMap<String, QuantityValue>,
}

/// Quantities come as strings, but be lenient about numbers too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QuantityValue {
    Number(f64),
    Text(String),
}

impl QuantityValue {
    fn as_f64(&self) -> Option<f64> {
        match self {
            QuantityValue::Number(n) => Some(*n),
            QuantityValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Ids show up as numbers in some endpoints and strings in others.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl From<RawId> for String {
    fn from(id: RawId) -> Self {
        match id {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

fn id_string<'de, D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Option<String>, D::Error> {
    Ok(Option::<RawId>::deserialize(d)?.map(String::from))
}

fn id_string_required<'de, D: serde::Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    Ok(RawId::deserialize(d)?.into())
}

/// Dates of a time-off request with a positive quantity.
fn time_off_entries(request: &TimeOffRequest) -> Vec<TimeOff> {
    let mut entries = Vec::new();
    for (day, quantity) in &request.dates {
        let Ok(date) = NaiveDate::parse_from_str(day, "%Y-%m-%d") else {
            warn!(employee_id = %request.employee_id, day = %day, "skipping time off with unreadable date");
            continue;
        };
        match quantity.as_f64() {
            Some(quantity) if quantity > 0.0 => entries.push(TimeOff { date, quantity }),
            _ => {}
        }
    }
    entries
}

pub struct BambooHr {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    matcher: SharedMatcher,
}

impl BambooHr {
    pub fn new(company_domain: &str, api_key: impl Into<String>, matcher: SharedMatcher) -> Result<Self> {
        let base_url = format!("https://api.bamboohr.com/api/gateway.php/{company_domain}/v1");
        Self::with_base_url(base_url, api_key, matcher)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        matcher: SharedMatcher,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(TIMEOUT).build()?;
        Ok(BambooHr {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            matcher,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, path))
            .basic_auth(&self.api_key, Some(PASSWORD))
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await?;
        let response = check_status(SERVICE, response).await?;
        Ok(response.json().await?)
    }

    async fn employee_by_id(&self, employee_id: &str) -> Result<EmployeeRecord> {
        self.get(
            &format!("employees/{employee_id}"),
            &[("fields", "firstName,lastName,workEmail,country")],
        )
        .await
    }
}

#[async_trait]
impl EmployeeDirectory for BambooHr {
    async fn get_employees_by_email(&self, emails: &[String]) -> Result<Vec<Employee>> {
        let wanted = EmailSet::with_emails(self.matcher.clone(), emails.iter().cloned());
        let users: HashMap<String, Option<User>> = self.get("meta/users", &[]).await?;

        // Deterministic order for the follow-up requests.
        let mut users: Vec<(String, User)> = users
            .into_iter()
            .filter_map(|(key, user)| user.map(|u| (key, u)))
            .collect();
        users.sort_by(|a, b| a.0.cmp(&b.0));

        let mut employees = Vec::new();
        for (_, user) in users {
            // Test accounts and the like have no email.
            let Some(email) = user.email.as_deref().filter(|e| !e.is_empty()) else {
                continue;
            };
            if !wanted.has(email) {
                continue;
            }
            let Some(employee_id) = user.employee_id.as_deref() else {
                debug!(email, "user has no employee record");
                continue;
            };

            let record = self.employee_by_id(employee_id).await?;
            employees.push(Employee {
                name: record.full_name(),
                country: record.country.as_deref().and_then(Country::parse),
                ..Employee::new(
                    record.id.clone(),
                    record.work_email.clone().unwrap_or_else(|| email.to_string()),
                )
            });
        }

        debug!(requested = emails.len(), found = employees.len(), "resolved employees");
        Ok(employees)
    }
}

#[async_trait]
impl TimeOffSource for BambooHr {
    async fn get_employees_time_off(
        &self,
        employees: &[Employee],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Employee>> {
        let (start, end) = (format_api_date(start), format_api_date(end));
        let requests: Vec<TimeOffRequest> = self
            .get(
                "time_off/requests",
                &[("start", start.as_str()), ("end", end.as_str()), ("status", "approved")],
            )
            .await?;

        let ids: HashSet<&str> = employees.iter().map(|e| e.id.as_str()).collect();
        let mut by_id: HashMap<String, Vec<TimeOff>> = HashMap::new();
        for request in &requests {
            if !ids.contains(request.employee_id.as_str()) {
                continue;
            }
            let entries = time_off_entries(request);
            if !entries.is_empty() {
                by_id.entry(request.employee_id.clone()).or_default().extend(entries);
            }
        }

        let annotated = employees
            .iter()
            .cloned()
            .map(|mut e| {
                if let Some(entries) = by_id.remove(&e.id) {
                    e.time_off.extend(entries);
                }
                e
            })
            .collect();
        Ok(annotated)
    }
}
