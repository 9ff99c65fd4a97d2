//! Tools for absence and leave records in Breathe HR.
//!
//! This module covers:
//! - Company-wide absence listing with employee, date range, type and status filters
//! - Absences for a single employee, optionally narrowed to a year or type
//! - Creating a new leave request

use rmcp::handler::server::wrapper::Parameters;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use crate::mcp::{
    error::BreatheError,
    http::{BreatheClient, Method, QueryParams},
    tools::params::{default_page, pagination, push_number, push_text},
};

pub const ABSENCES_PER_PAGE_CAP: u32 = 100;

const fn default_per_page() -> u32 {
    50
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListAbsencesRequest {
    #[serde(default = "default_page")]
    #[schemars(description = "Page number for pagination (default: 1)")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    #[schemars(description = "Number of absences per page (default: 50, max: 100)")]
    pub per_page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Filter by a specific employee ID")]
    pub employee_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Only absences starting from this date (YYYY-MM-DD)")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Only absences ending before this date (YYYY-MM-DD)")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Filter by absence type (holiday, sick, etc.)")]
    pub absence_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Filter by status (pending, approved, rejected)")]
    pub status: Option<String>,
}

impl ListAbsencesRequest {
    pub fn query_params(&self) -> QueryParams {
        let mut params = pagination(self.page, self.per_page, ABSENCES_PER_PAGE_CAP);
        push_number(&mut params, "employee_id", self.employee_id);
        push_text(&mut params, "start_date", self.start_date.as_deref());
        push_text(&mut params, "end_date", self.end_date.as_deref());
        push_text(&mut params, "type", self.absence_type.as_deref());
        push_text(&mut params, "status", self.status.as_deref());
        params
    }
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct EmployeeAbsencesRequest {
    #[schemars(description = "The unique Breathe HR ID of the employee")]
    pub employee_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Only absences in this calendar year, e.g. 2024")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Filter by absence type (holiday, sick, etc.)")]
    pub absence_type: Option<String>,
}

impl EmployeeAbsencesRequest {
    pub fn query_params(&self) -> QueryParams {
        let mut params = vec![("employee_id", self.employee_id.to_string())];
        push_number(&mut params, "year", self.year);
        push_text(&mut params, "type", self.absence_type.as_deref());
        params
    }
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct LeaveRequest {
    #[schemars(description = "The ID of the employee requesting leave")]
    pub employee_id: u64,
    #[schemars(description = "Start date of the absence (YYYY-MM-DD)")]
    pub start_date: String,
    #[schemars(description = "End date of the absence (YYYY-MM-DD)")]
    pub end_date: String,
    #[schemars(description = "Type of absence (holiday, sick, personal, etc.)")]
    pub absence_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Optional reason for the absence")]
    pub reason: Option<String>,
    #[serde(default)]
    #[schemars(description = "Whether this is a half-day absence (default: false)")]
    pub half_day: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "For half-day absences, either 'morning' or 'afternoon'")]
    pub half_day_period: Option<String>,
}

impl LeaveRequest {
    /// Upstream body; `absence_type` is sent as `type`.
    pub fn body(&self) -> Value {
        let mut body = json!({
            "employee_id": self.employee_id,
            "start_date": self.start_date,
            "end_date": self.end_date,
            "type": self.absence_type,
            "half_day": self.half_day,
        });

        if let Some(reason) = self.reason.as_deref().filter(|r| !r.is_empty()) {
            body["reason"] = json!(reason);
        }
        if let Some(period) = self
            .half_day_period
            .as_deref()
            .filter(|p| self.half_day && !p.is_empty())
        {
            body["half_day_period"] = json!(period);
        }
        body
    }
}

pub async fn list_absences(
    client: &BreatheClient,
    Parameters(args): Parameters<ListAbsencesRequest>,
) -> Result<Value, BreatheError> {
    client.get("absences", Some(&args.query_params())).await
}

pub async fn get_employee_absences(
    client: &BreatheClient,
    Parameters(args): Parameters<EmployeeAbsencesRequest>,
) -> Result<Value, BreatheError> {
    client
        .get(
            &format!("employees/{}/absences", args.employee_id),
            Some(&args.query_params()),
        )
        .await
}

pub async fn create_leave_request(
    client: &BreatheClient,
    Parameters(args): Parameters<LeaveRequest>,
) -> Result<Value, BreatheError> {
    info!(
        employee_id = args.employee_id,
        start_date = %args.start_date,
        end_date = %args.end_date,
        "creating leave request"
    );
    client
        .request("absences", Method::POST, None, Some(&args.body()))
        .await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, method, path, query_param, query_param_is_missing},
    };

    use super::*;
    use crate::mcp::config::BreatheConfig;

    fn client_for(server: &MockServer) -> BreatheClient {
        BreatheClient::new(&BreatheConfig::for_upstream(&server.uri(), Some("key"))).unwrap()
    }

    #[test]
    fn list_absences_renames_type_and_skips_unset_filters() {
        let args: ListAbsencesRequest = serde_json::from_value(json!({
            "employee_id": 1,
            "start_date": "2024-01-01",
            "absence_type": "holiday",
            "status": ""
        }))
        .unwrap();
        assert_eq!(
            args.query_params(),
            vec![
                ("page", "1".to_string()),
                ("per_page", "50".to_string()),
                ("employee_id", "1".to_string()),
                ("start_date", "2024-01-01".to_string()),
                ("type", "holiday".to_string()),
            ]
        );
    }

    #[test]
    fn zero_employee_id_is_not_a_filter() {
        let args: ListAbsencesRequest =
            serde_json::from_value(json!({"employee_id": 0, "per_page": 250})).unwrap();
        assert_eq!(
            args.query_params(),
            vec![("page", "1".to_string()), ("per_page", "100".to_string())]
        );
    }

    #[test]
    fn employee_absences_include_employee_id_and_optional_filters() {
        let args = EmployeeAbsencesRequest {
            employee_id: 7,
            year: Some(2024),
            absence_type: Some("sick".to_string()),
        };
        assert_eq!(
            args.query_params(),
            vec![
                ("employee_id", "7".to_string()),
                ("year", "2024".to_string()),
                ("type", "sick".to_string()),
            ]
        );
    }

    #[test]
    fn half_day_period_requires_half_day() {
        let mut leave = LeaveRequest {
            employee_id: 1,
            start_date: "2024-02-01".to_string(),
            end_date: "2024-02-05".to_string(),
            absence_type: "holiday".to_string(),
            reason: Some("Vacation".to_string()),
            half_day: false,
            half_day_period: Some("morning".to_string()),
        };
        assert_eq!(
            leave.body(),
            json!({
                "employee_id": 1,
                "start_date": "2024-02-01",
                "end_date": "2024-02-05",
                "type": "holiday",
                "reason": "Vacation",
                "half_day": false
            })
        );

        leave.half_day = true;
        assert_eq!(leave.body()["half_day_period"], "morning");
    }

    #[tokio::test]
    async fn list_absences_sends_filters_upstream() {
        let server = MockServer::start().await;
        let body = json!({"absences": [{"id": 1, "employee_id": 1, "start_date": "2024-01-01"}]});
        Mock::given(method("GET"))
            .and(path("/absences"))
            .and(query_param("page", "1"))
            .and(query_param("per_page", "100"))
            .and(query_param("employee_id", "1"))
            .and(query_param("type", "sick"))
            .and(query_param_is_missing("absence_type"))
            .and(query_param_is_missing("status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let args: ListAbsencesRequest = serde_json::from_value(json!({
            "per_page": 300,
            "employee_id": 1,
            "absence_type": "sick",
            "status": ""
        }))
        .unwrap();
        let result = list_absences(&client_for(&server), Parameters(args))
            .await
            .unwrap();
        assert_eq!(result, body);
    }

    #[tokio::test]
    async fn employee_absences_hit_nested_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/employees/7/absences"))
            .and(query_param("employee_id", "7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"absences": []})))
            .expect(1)
            .mount(&server)
            .await;

        let args = EmployeeAbsencesRequest {
            employee_id: 7,
            year: None,
            absence_type: None,
        };
        let result = get_employee_absences(&client_for(&server), Parameters(args))
            .await
            .unwrap();
        assert_eq!(result, json!({"absences": []}));
    }

    #[tokio::test]
    async fn create_leave_request_posts_body() {
        let server = MockServer::start().await;
        let created = json!({"id": 123, "status": "pending"});
        Mock::given(method("POST"))
            .and(path("/absences"))
            .and(body_json(json!({
                "employee_id": 1,
                "start_date": "2024-02-01",
                "end_date": "2024-02-05",
                "type": "holiday",
                "half_day": false
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(created.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let args = LeaveRequest {
            employee_id: 1,
            start_date: "2024-02-01".to_string(),
            end_date: "2024-02-05".to_string(),
            absence_type: "holiday".to_string(),
            reason: None,
            half_day: false,
            half_day_period: None,
        };
        let result = create_leave_request(&client_for(&server), Parameters(args))
            .await
            .unwrap();
        assert_eq!(result, created);
    }
}
