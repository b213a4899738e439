//! Work bucket statistics.
//!
//! The aggregator pulls a work bucket from the work source, folds the task
//! assignees into one record per person (matching emails with the configured
//! [`EmailMatcher`](crate::email::EmailMatcher)), enriches those records with
//! the employee directory and the time-off source, fetches public holidays for
//! every country involved and finally counts points and working days.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use futures::future::try_join_all;
use tracing::{debug, info, warn};

use crate::calendar::{self, Holiday};
use crate::email::{EmailMap, SharedMatcher};
use crate::employee::Employee;
use crate::error::{Error, Result};
use crate::fields::Country;
use crate::integrations::{EmployeeDirectory, HolidaySource, TimeOffSource, WorkSource};
use crate::progress::activity;
use crate::stats::{DateRange, EmployeeStats, Stats, WorkBucketStats};
use crate::task::Task;

/// Points assumed for tasks nobody estimated.
///
/// The bucket total assumes unestimated work had some cost, while the
/// per-employee totals only count what was explicitly estimated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregatorOptions {
    pub bucket_unestimated_points: f64,
    pub employee_unestimated_points: f64,
}

impl Default for AggregatorOptions {
    fn default() -> Self {
        AggregatorOptions {
            bucket_unestimated_points: 1.0,
            employee_unestimated_points: 0.0,
        }
    }
}

pub struct StatsAggregator {
    work: Arc<dyn WorkSource>,
    time_off: Arc<dyn TimeOffSource>,
    holidays: Arc<dyn HolidaySource>,
    directory: Arc<dyn EmployeeDirectory>,
    matcher: SharedMatcher,
    options: AggregatorOptions,
}

/// Employees and their estimated points, both keyed by email.
struct Involvement {
    employees: EmailMap<Employee>,
    points: EmailMap<f64>,
    observed: DateRange,
}

impl StatsAggregator {
    pub fn new(
        work: Arc<dyn WorkSource>,
        time_off: Arc<dyn TimeOffSource>,
        holidays: Arc<dyn HolidaySource>,
        directory: Arc<dyn EmployeeDirectory>,
        matcher: SharedMatcher,
    ) -> Self {
        StatsAggregator {
            work,
            time_off,
            holidays,
            directory,
            matcher,
            options: AggregatorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AggregatorOptions) -> Self {
        self.options = options;
        self
    }

    /// Compute statistics for `work_bucket_uri`.
    ///
    /// `start` / `end` both narrow the tasks the work source returns and fix
    /// the period working days are counted over. When absent, the period
    /// runs from the earliest task start to the latest task completion.
    pub async fn calculate_stats(
        &self,
        work_bucket_uri: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<WorkBucketStats> {
        if work_bucket_uri.trim().is_empty() {
            return Err(Error::invalid_input("Argument 'workBucketURI' is mandatory"));
        }

        let work_bucket = activity(
            "Fetching work bucket information",
            self.work.get_work_bucket(work_bucket_uri, start, end),
        )
        .await?;

        let Involvement {
            mut employees,
            points,
            observed,
        } = self.collect_involvement(&work_bucket.tasks)?;

        let date_range = DateRange {
            start: start.unwrap_or(observed.start),
            end: end.unwrap_or(observed.end),
        };
        let (first_day, last_day) = (date_range.start.date_naive(), date_range.end.date_naive());

        debug!(
            tasks = work_bucket.tasks.len(),
            employees = employees.len(),
            %first_day,
            %last_day,
            "collected work bucket"
        );

        let mut holidays_per_country = HashMap::new();
        if !employees.is_empty() {
            self.enrich(&mut employees).await?;
            if date_range.is_empty() {
                debug!("no task was started or completed; skipping time off and holidays");
            } else {
                self.annotate_time_off(&mut employees, first_day, last_day).await?;
                holidays_per_country = self.fetch_holidays(&employees, first_day, last_day).await?;
            }
        }

        let total_points = work_bucket.points(self.options.bucket_unestimated_points);
        let mut total_working_days = 0;
        let mut employee_stats = Vec::with_capacity(employees.len());

        for employee in employees.into_values() {
            let country_holidays = employee
                .country
                .and_then(|c| holidays_per_country.get(&c))
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let working_days = calendar::working_days(&employee, country_holidays, first_day, last_day);
            let employee_points = points.get(&employee.email).copied().unwrap_or(0.0);

            total_working_days += working_days;
            employee_stats.push(EmployeeStats {
                stats: Stats::new(employee_points, working_days, date_range),
                employee,
            });
        }

        info!(
            points = total_points,
            working_days = total_working_days,
            employees = employee_stats.len(),
            "calculated work bucket statistics"
        );

        Ok(WorkBucketStats {
            work_bucket,
            stats: Stats::new(total_points, total_working_days, date_range),
            employee_stats,
        })
    }

    /// Single pass over the tasks: who worked on what, how many points each,
    /// and the earliest start / latest completion seen.
    fn collect_involvement(&self, tasks: &[Task]) -> Result<Involvement> {
        let mut employees: EmailMap<Employee> = EmailMap::new(self.matcher.clone());
        let mut points: EmailMap<f64> = EmailMap::new(self.matcher.clone());
        let mut observed = DateRange::empty();

        for task in tasks {
            if let Some(started) = task.started_at {
                observed.start = observed.start.min(started);
            }
            if let Some(done) = task.done_at {
                observed.end = observed.end.max(done);
            }

            let Some(assignee) = &task.assigned_to else {
                continue;
            };

            // First occurrence of a person is the canonical record.
            if !employees.has(&assignee.email) {
                let mut employee = assignee.clone();
                employee.tasks.clear();
                employees.set(assignee.email.clone(), employee);
            }

            let so_far = points.get(&assignee.email).copied().unwrap_or(0.0);
            points.set(
                assignee.email.clone(),
                so_far + task.points_or(self.options.employee_unestimated_points),
            );

            employees
                .get_mut(&assignee.email)
                .ok_or_else(|| Error::Invariant(format!("assignee '{}' must always be found", assignee.email)))?
                .tasks
                .push(task.clone());
        }

        Ok(Involvement {
            employees,
            points,
            observed,
        })
    }

    /// Overwrite name, country and id with what the directory knows.
    async fn enrich(&self, employees: &mut EmailMap<Employee>) -> Result<()> {
        let emails: Vec<String> = employees.keys().map(String::from).collect();
        let records = activity(
            "Fetching employee information",
            self.directory.get_employees_by_email(&emails),
        )
        .await?;

        for record in records {
            let employee = employees.get_mut(&record.email).ok_or_else(|| {
                Error::Invariant(format!(
                    "directory returned '{}', which matches no employee in the work bucket",
                    record.email
                ))
            })?;
            employee.name = record.name;
            employee.country = record.country;
            employee.id = record.id;
        }
        Ok(())
    }

    /// Attach time off. Employees the source knows nothing about simply had
    /// none.
    async fn annotate_time_off(
        &self,
        employees: &mut EmailMap<Employee>,
        first_day: NaiveDate,
        last_day: NaiveDate,
    ) -> Result<()> {
        let list: Vec<Employee> = employees.values().cloned().collect();
        let annotated = activity(
            "Fetching employees time off",
            self.time_off.get_employees_time_off(&list, first_day, last_day),
        )
        .await?;

        for returned in annotated {
            match employees.get_mut(&returned.email) {
                Some(employee) => employee.time_off = returned.time_off,
                None => warn!(email = %returned.email, "time off returned for unknown employee"),
            }
        }
        Ok(())
    }

    /// One holiday request per known country, issued concurrently.
    async fn fetch_holidays(
        &self,
        employees: &EmailMap<Employee>,
        first_day: NaiveDate,
        last_day: NaiveDate,
    ) -> Result<HashMap<Country, Vec<Holiday>>> {
        let countries: BTreeSet<Option<Country>> = employees.values().map(|e| e.country).collect();
        if countries.contains(&None) {
            let unknown = employees.values().filter(|e| e.country.is_none()).count();
            debug!(unknown, "employees without a known country get no public holidays");
        }

        let fetches = countries.into_iter().flatten().map(|country| async move {
            let description = format!("Fetching known holidays for {}", country.name());
            let holidays = activity(&description, self.holidays.get_holidays(country, first_day, last_day)).await?;
            Ok::<_, Error>((country, holidays))
        });

        Ok(try_join_all(fetches).await?.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::IgnoreDomain;
    use crate::employee::TimeOff;
    use crate::task::WorkBucket;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeWork(WorkBucket);

    #[async_trait]
    impl WorkSource for FakeWork {
        async fn get_work_bucket(
            &self,
            uri: &str,
            _start: Option<DateTime<Utc>>,
            _end: Option<DateTime<Utc>>,
        ) -> Result<WorkBucket> {
            if uri == "missing" {
                return Err(Error::invalid_input("Invalid 'workBucketURI' provided"));
            }
            Ok(self.0.clone())
        }
    }

    /// Hands back every configured record, whatever was asked for.
    #[derive(Default)]
    struct FakeDirectory(Vec<Employee>);

    #[async_trait]
    impl EmployeeDirectory for FakeDirectory {
        async fn get_employees_by_email(&self, _emails: &[String]) -> Result<Vec<Employee>> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct FakeTimeOff {
        by_id: Vec<(String, TimeOff)>,
        requested: Mutex<Option<(NaiveDate, NaiveDate)>>,
    }

    #[async_trait]
    impl TimeOffSource for FakeTimeOff {
        async fn get_employees_time_off(
            &self,
            employees: &[Employee],
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<Vec<Employee>> {
            *self.requested.lock().unwrap() = Some((start, end));
            Ok(employees
                .iter()
                .cloned()
                .map(|mut e| {
                    e.time_off = self.by_id.iter().filter(|(id, _)| *id == e.id).map(|(_, t)| *t).collect();
                    e
                })
                .collect())
        }
    }

    #[derive(Default)]
    struct FakeHolidays {
        days: Vec<(Country, NaiveDate)>,
        calls: Mutex<Vec<Country>>,
    }

    #[async_trait]
    impl HolidaySource for FakeHolidays {
        async fn get_holidays(&self, country: Country, _start: NaiveDate, _end: NaiveDate) -> Result<Vec<Holiday>> {
            self.calls.lock().unwrap().push(country);
            Ok(self
                .days
                .iter()
                .filter(|(c, _)| *c == country)
                .map(|(c, d)| Holiday {
                    start_date: *d,
                    end_date: *d,
                    name: "Holiday".into(),
                    country: *c,
                })
                .collect())
        }
    }

    /// Collaborator that is always down.
    struct Unavailable(&'static str);

    impl Unavailable {
        fn error(&self) -> Error {
            Error::Api {
                service: self.0,
                status: 503,
                body: "unavailable".into(),
            }
        }
    }

    #[async_trait]
    impl EmployeeDirectory for Unavailable {
        async fn get_employees_by_email(&self, _emails: &[String]) -> Result<Vec<Employee>> {
            Err(self.error())
        }
    }

    #[async_trait]
    impl TimeOffSource for Unavailable {
        async fn get_employees_time_off(
            &self,
            _employees: &[Employee],
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<Vec<Employee>> {
            Err(self.error())
        }
    }

    #[async_trait]
    impl HolidaySource for Unavailable {
        async fn get_holidays(&self, _country: Country, _start: NaiveDate, _end: NaiveDate) -> Result<Vec<Holiday>> {
            Err(self.error())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        date(y, m, d).and_hms_opt(h, 0, 0).unwrap().and_utc()
    }

    fn task(id: &str, estimation: Option<f64>, email: Option<&str>) -> Task {
        Task {
            id: id.into(),
            title: format!("Task {id}"),
            estimation,
            created_at: at(2023, 12, 20, 9),
            // 2024-01-01 is a Monday, 2024-01-05 a Friday.
            started_at: Some(at(2024, 1, 1, 10)),
            done_at: Some(at(2024, 1, 5, 18)),
            assigned_to: email.map(|e| Employee::new(format!("linear-{e}"), e)),
        }
    }

    fn bucket(tasks: Vec<Task>) -> WorkBucket {
        WorkBucket {
            id: "wb-1".into(),
            name: "team/core/cycle/1".into(),
            tasks,
        }
    }

    fn directory_record(id: &str, email: &str, name: &str, country: Option<Country>) -> Employee {
        Employee {
            name: Some(name.into()),
            country,
            ..Employee::new(id, email)
        }
    }

    struct Setup {
        work: WorkBucket,
        directory: FakeDirectory,
        time_off: Arc<FakeTimeOff>,
        holidays: Arc<FakeHolidays>,
    }

    impl Setup {
        fn new(tasks: Vec<Task>) -> Self {
            Setup {
                work: bucket(tasks),
                directory: FakeDirectory::default(),
                time_off: Arc::new(FakeTimeOff::default()),
                holidays: Arc::new(FakeHolidays::default()),
            }
        }

        fn aggregator(self) -> (StatsAggregator, Arc<FakeTimeOff>, Arc<FakeHolidays>) {
            let aggregator = StatsAggregator::new(
                Arc::new(FakeWork(self.work)),
                self.time_off.clone(),
                self.holidays.clone(),
                Arc::new(self.directory),
                Arc::new(IgnoreDomain),
            );
            (aggregator, self.time_off, self.holidays)
        }
    }

    #[tokio::test]
    async fn test_aliases_merge_into_one_employee() {
        let setup = Setup::new(vec![
            task("1", Some(3.0), Some("alice@co.com")),
            task("2", None, Some("alice@alt.com")),
        ]);
        let (aggregator, _, _) = setup.aggregator();

        let stats = aggregator.calculate_stats("team/core/cycle/1", None, None).await.unwrap();

        assert_eq!(stats.stats.points, 4.0);
        assert_eq!(stats.employee_stats.len(), 1);
        let alice = &stats.employee_stats[0];
        assert_eq!(alice.employee.email, "alice@co.com");
        assert_eq!(alice.stats.points, 3.0);
        assert_eq!(alice.employee.tasks.len(), 2);
        assert_eq!(alice.stats.working_days, 5);
    }

    #[tokio::test]
    async fn test_empty_bucket() {
        let (aggregator, time_off, holidays) = Setup::new(vec![]).aggregator();

        let stats = aggregator.calculate_stats("team/core/cycle/1", None, None).await.unwrap();

        assert_eq!(stats.stats.points, 0.0);
        assert_eq!(stats.stats.working_days, 0);
        assert!(stats.stats.avg_points_per_working_days.is_nan());
        assert!(stats.employee_stats.is_empty());
        assert_eq!(stats.stats.date_range, DateRange::empty());
        assert!(time_off.requested.lock().unwrap().is_none());
        assert!(holidays.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unassigned_tasks_count_for_bucket_only() {
        let (aggregator, _, _) = Setup::new(vec![
            task("1", Some(2.0), Some("bob@co.com")),
            task("2", None, None),
            task("3", Some(5.0), None),
        ])
        .aggregator();

        let stats = aggregator.calculate_stats("team/core/cycle/1", None, None).await.unwrap();

        assert_eq!(stats.stats.points, 8.0);
        assert_eq!(stats.employee_stats.len(), 1);
        assert_eq!(stats.employee_stats[0].stats.points, 2.0);
    }

    #[tokio::test]
    async fn test_observed_range_spans_tasks() {
        let mut early = task("1", Some(1.0), Some("alice@co.com"));
        early.started_at = Some(at(2023, 12, 27, 8));
        early.done_at = None;
        let mut late = task("2", Some(1.0), Some("bob@co.com"));
        late.started_at = None;
        late.done_at = Some(at(2024, 1, 9, 17));
        let (aggregator, time_off, _) = Setup::new(vec![early, late]).aggregator();

        let stats = aggregator.calculate_stats("team/core/cycle/1", None, None).await.unwrap();

        assert_eq!(stats.stats.date_range.start, at(2023, 12, 27, 8));
        assert_eq!(stats.stats.date_range.end, at(2024, 1, 9, 17));
        assert_eq!(*time_off.requested.lock().unwrap(), Some((date(2023, 12, 27), date(2024, 1, 9))));
        // Wed 27 Dec .. Tue 9 Jan: 3 + 5 + 2 weekdays.
        assert_eq!(stats.employee_stats[0].stats.working_days, 10);
        assert_eq!(stats.stats.working_days, 20);
    }

    #[tokio::test]
    async fn test_explicit_range_wins() {
        let (aggregator, _, _) = Setup::new(vec![task("1", Some(4.0), Some("alice@co.com"))]).aggregator();
        let start = at(2024, 1, 1, 0);
        let end = at(2024, 1, 2, 0);

        let stats = aggregator.calculate_stats("team/core/cycle/1", Some(start), Some(end)).await.unwrap();

        assert_eq!(stats.stats.date_range, DateRange { start, end });
        assert_eq!(stats.employee_stats[0].stats.working_days, 2);
        assert_eq!(stats.employee_stats[0].stats.avg_points_per_working_days, 2.0);
    }

    #[tokio::test]
    async fn test_directory_time_off_and_holidays() {
        let mut setup = Setup::new(vec![
            task("1", Some(5.0), Some("alice@co.com")),
            task("2", Some(3.0), Some("bob@co.com")),
            task("3", Some(2.0), Some("carol@co.com")),
            task("4", Some(1.0), Some("dan@co.com")),
        ]);
        setup.directory = FakeDirectory(vec![
            directory_record("hr-1", "alice@hr.co", "Alice Anders", Some(Country::Portugal)),
            directory_record("hr-2", "bob@hr.co", "Bob Berg", Some(Country::Portugal)),
            directory_record("hr-3", "carol@hr.co", "Carol Cruz", Some(Country::Spain)),
        ]);
        setup.time_off = Arc::new(FakeTimeOff {
            // Wednesday, keyed by the directory id.
            by_id: vec![("hr-2".into(), TimeOff { date: date(2024, 1, 3), quantity: 1.0 })],
            ..Default::default()
        });
        setup.holidays = Arc::new(FakeHolidays {
            days: vec![(Country::Portugal, date(2024, 1, 1)), (Country::Spain, date(2024, 1, 6))],
            ..Default::default()
        });
        let (aggregator, _, holidays) = setup.aggregator();

        let stats = aggregator.calculate_stats("team/core/cycle/1", None, None).await.unwrap();

        let by_email = |email: &str| {
            stats
                .employee_stats
                .iter()
                .find(|s| s.employee.email == email)
                .unwrap()
        };

        let alice = by_email("alice@co.com");
        assert_eq!(alice.employee.id, "hr-1");
        assert_eq!(alice.employee.name.as_deref(), Some("Alice Anders"));
        assert_eq!(alice.stats.working_days, 4);

        let bob = by_email("bob@co.com");
        assert_eq!(bob.stats.working_days, 3);
        assert_eq!(bob.stats.avg_points_per_working_days, 1.0);

        // Spanish holiday lands on a Saturday.
        assert_eq!(by_email("carol@co.com").stats.working_days, 5);

        let dan = by_email("dan@co.com");
        assert_eq!(dan.employee.country, None);
        assert_eq!(dan.employee.id, "linear-dan@co.com");
        assert_eq!(dan.stats.working_days, 5);

        assert_eq!(stats.stats.working_days, 17);
        assert_eq!(stats.stats.points, 11.0);
        assert_eq!(stats.stats.avg_points_per_working_days, 11.0 / 17.0);

        let mut calls = holidays.calls.lock().unwrap().clone();
        calls.sort();
        assert_eq!(calls, vec![Country::Portugal, Country::Spain]);
    }

    #[tokio::test]
    async fn test_employee_order_follows_first_assignment() {
        let (aggregator, _, _) = Setup::new(vec![
            task("1", Some(1.0), Some("zoe@co.com")),
            task("2", Some(1.0), Some("adam@co.com")),
            task("3", Some(1.0), Some("zoe@alt.com")),
        ])
        .aggregator();

        let stats = aggregator.calculate_stats("team/core/cycle/1", None, None).await.unwrap();
        let emails: Vec<_> = stats.employee_stats.iter().map(|s| s.employee.email.as_str()).collect();
        assert_eq!(emails, vec!["zoe@co.com", "adam@co.com"]);
    }

    #[tokio::test]
    async fn test_directory_record_without_assignee_is_an_invariant_violation() {
        let mut setup = Setup::new(vec![task("1", Some(1.0), Some("alice@co.com"))]);
        setup.directory = FakeDirectory(vec![directory_record("hr-9", "mallory@hr.co", "Mallory", None)]);
        let (aggregator, _, _) = setup.aggregator();

        let err = aggregator.calculate_stats("team/core/cycle/1", None, None).await.unwrap_err();
        assert!(matches!(err, Error::Invariant(_)));
    }

    #[tokio::test]
    async fn test_work_source_errors_propagate() {
        let (aggregator, _, _) = Setup::new(vec![]).aggregator();

        let err = aggregator.calculate_stats("missing", None, None).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = aggregator.calculate_stats("", None, None).await.unwrap_err();
        assert!(err.to_string().contains("mandatory"));
    }

    #[tokio::test]
    async fn test_unestimated_defaults_are_configurable() {
        let (aggregator, _, _) = Setup::new(vec![
            task("1", None, Some("alice@co.com")),
            task("2", Some(2.0), Some("alice@co.com")),
        ])
        .aggregator();
        let aggregator = aggregator.with_options(AggregatorOptions {
            bucket_unestimated_points: 0.0,
            employee_unestimated_points: 1.0,
        });

        let stats = aggregator.calculate_stats("team/core/cycle/1", None, None).await.unwrap();
        assert_eq!(stats.stats.points, 2.0);
        assert_eq!(stats.employee_stats[0].stats.points, 3.0);
    }

    #[tokio::test]
    async fn test_unstarted_tasks_skip_time_off_and_holidays() {
        let mut planned = task("1", Some(3.0), Some("alice@co.com"));
        planned.started_at = None;
        planned.done_at = None;
        let mut setup = Setup::new(vec![planned]);
        setup.directory = FakeDirectory(vec![directory_record(
            "hr-1",
            "alice@hr.co",
            "Alice Anders",
            Some(Country::Portugal),
        )]);
        let (aggregator, time_off, holidays) = setup.aggregator();

        let stats = aggregator.calculate_stats("team/core/cycle/1", None, None).await.unwrap();

        assert!(stats.stats.date_range.is_empty());
        assert!(time_off.requested.lock().unwrap().is_none());
        assert!(holidays.calls.lock().unwrap().is_empty());
        let alice = &stats.employee_stats[0];
        assert_eq!(alice.employee.name.as_deref(), Some("Alice Anders"));
        assert_eq!(alice.stats.points, 3.0);
        assert_eq!(alice.stats.working_days, 0);
        assert_eq!(stats.stats.working_days, 0);
    }

    fn portuguese_alice() -> FakeDirectory {
        FakeDirectory(vec![directory_record("hr-1", "alice@hr.co", "Alice", Some(Country::Portugal))])
    }

    #[tokio::test]
    async fn test_directory_errors_propagate() {
        let aggregator = StatsAggregator::new(
            Arc::new(FakeWork(bucket(vec![task("1", Some(1.0), Some("alice@co.com"))]))),
            Arc::new(FakeTimeOff::default()),
            Arc::new(FakeHolidays::default()),
            Arc::new(Unavailable("BambooHR")),
            Arc::new(IgnoreDomain),
        );

        let err = aggregator.calculate_stats("team/core/cycle/1", None, None).await.unwrap_err();
        assert!(matches!(err, Error::Api { service: "BambooHR", status: 503, .. }));
    }

    #[tokio::test]
    async fn test_time_off_errors_propagate() {
        let holidays = Arc::new(FakeHolidays::default());
        let aggregator = StatsAggregator::new(
            Arc::new(FakeWork(bucket(vec![task("1", Some(1.0), Some("alice@co.com"))]))),
            Arc::new(Unavailable("BambooHR")),
            holidays.clone(),
            Arc::new(portuguese_alice()),
            Arc::new(IgnoreDomain),
        );

        let err = aggregator.calculate_stats("team/core/cycle/1", None, None).await.unwrap_err();
        assert!(matches!(err, Error::Api { service: "BambooHR", status: 503, .. }));
        assert!(holidays.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_holiday_errors_propagate() {
        let aggregator = StatsAggregator::new(
            Arc::new(FakeWork(bucket(vec![task("1", Some(1.0), Some("alice@co.com"))]))),
            Arc::new(FakeTimeOff::default()),
            Arc::new(Unavailable("OpenHolidays")),
            Arc::new(portuguese_alice()),
            Arc::new(IgnoreDomain),
        );

        let err = aggregator.calculate_stats("team/core/cycle/1", None, None).await.unwrap_err();
        assert!(matches!(err, Error::Api { service: "OpenHolidays", status: 503, .. }));
    }
}
