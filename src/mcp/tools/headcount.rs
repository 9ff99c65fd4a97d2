//! Tool for counting the employees employed on a given calendar date.
//!
//! Unlike the other tools this one does work client-side: it walks every page
//! of `employees` and checks each record's employment window
//! `[join_date, leaving_date)` against the requested date.
//!
//! Bad data is skipped per record: a missing or malformed `join_date` drops
//! the record, a malformed `leaving_date` leaves the employee counted as still
//! employed. Any failed page fetch aborts the whole count.
//!
//! Pagination stops only on an empty or short page. There is no page ceiling,
//! so an upstream that keeps returning full pages keeps the loop running.

use chrono::NaiveDate;
use rmcp::handler::server::wrapper::Parameters;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::mcp::{
    error::BreatheError,
    http::BreatheClient,
    tools::params::pagination,
};

pub const PAGE_SIZE: u32 = 100;
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct HeadcountRequest {
    #[schemars(description = "The date to check, in YYYY-MM-DD format, e.g. 2024-06-05")]
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployedEmployee {
    pub id: Value,
    pub name: String,
    pub join_date: String,
    pub leaving_date: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadcountReport {
    pub query_date: String,
    pub employed_count: usize,
    pub total_checked: usize,
    pub employed_employees: Vec<EmployedEmployee>,
}

/// Parses a `YYYY-MM-DD` query date.
///
/// # Errors
/// `InvalidParams` naming the offending value.
pub fn parse_query_date(date: &str) -> Result<NaiveDate, BreatheError> {
    NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| {
        BreatheError::InvalidParams(format!(
            "Invalid date format: '{date}'. Expected YYYY-MM-DD."
        ))
    })
}

fn parse_record_date(value: &Value) -> Option<NaiveDate> {
    value
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
}

/// Summary of `record` if it was employed on `date`, `None` otherwise.
pub fn employed_on(record: &Value, date: NaiveDate) -> Option<EmployedEmployee> {
    let raw_join = record.get("join_date").filter(|v| !v.is_null())?;
    let Some(joined) = parse_record_date(raw_join) else {
        warn!(id = %record["id"], join_date = %raw_join, "skipping employee with unparsable join_date");
        return None;
    };
    if joined > date {
        return None;
    }

    let leaving_date = record.get("leaving_date").cloned().unwrap_or(Value::Null);
    if !leaving_date.is_null() {
        match parse_record_date(&leaving_date) {
            Some(left) if left <= date => return None,
            Some(_) => {}
            None => {
                debug!(id = %record["id"], leaving_date = %leaving_date, "unparsable leaving_date, treating as employed");
            }
        }
    }

    Some(EmployedEmployee {
        id: record.get("id").cloned().unwrap_or(Value::Null),
        name: record
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
            .to_string(),
        join_date: raw_join.as_str().unwrap_or_default().to_string(),
        leaving_date,
    })
}

/// Applies the employment test to every record, keeping fetch order.
pub fn summarise(query_date: &str, date: NaiveDate, employees: &[Value]) -> HeadcountReport {
    let employed_employees: Vec<EmployedEmployee> = employees
        .iter()
        .filter_map(|record| employed_on(record, date))
        .collect();

    HeadcountReport {
        query_date: query_date.to_string(),
        employed_count: employed_employees.len(),
        total_checked: employees.len(),
        employed_employees,
    }
}

/// Fetches every employee page sequentially until an empty or short page.
///
/// # Errors
/// The first failed page fetch, unchanged.
pub async fn fetch_all_employees(client: &BreatheClient) -> Result<Vec<Value>, BreatheError> {
    let mut all_employees = Vec::new();
    let mut page = 1;

    loop {
        debug!(page, "fetching employee page");
        let mut response = client
            .get("employees", Some(&pagination(page, PAGE_SIZE, PAGE_SIZE)))
            .await?;

        let records = match response.get_mut("data").map(Value::take) {
            Some(Value::Array(records)) => records,
            _ => Vec::new(),
        };
        if records.is_empty() {
            break;
        }

        let fetched = records.len();
        all_employees.extend(records);
        if fetched < PAGE_SIZE as usize {
            break;
        }
        page += 1;
    }

    Ok(all_employees)
}

pub async fn count_employees_on_date(
    client: &BreatheClient,
    Parameters(args): Parameters<HeadcountRequest>,
) -> Result<Value, BreatheError> {
    let date = parse_query_date(&args.date)?;
    let employees = fetch_all_employees(client).await?;
    let report = summarise(&args.date, date, &employees);

    info!(
        query_date = %report.query_date,
        employed_count = report.employed_count,
        total_checked = report.total_checked,
        "counted employees on date"
    );

    Ok(serde_json::to_value(report)?)
}
