//! Tools for reading employee records from Breathe HR.
//!
//! - `list_employees`: paginated listing with department/status filters
//! - `get_employee`: a single employee by ID
//! - `search_employees`: free-text search over name, email and other attributes

use rmcp::handler::server::wrapper::Parameters;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::mcp::{
    error::BreatheError,
    http::{BreatheClient, QueryParams},
    tools::params::{default_page, pagination, push_text},
};

pub const LIST_PER_PAGE_CAP: u32 = 100;
pub const SEARCH_PER_PAGE_CAP: u32 = 50;

const fn default_list_per_page() -> u32 {
    50
}

const fn default_search_per_page() -> u32 {
    20
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListEmployeesRequest {
    #[serde(default = "default_page")]
    #[schemars(description = "Page number for pagination (default: 1)")]
    pub page: u32,
    #[serde(default = "default_list_per_page")]
    #[schemars(description = "Number of employees per page (default: 50, max: 100)")]
    pub per_page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Filter by department name, e.g. Engineering")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Filter by employment status (active, inactive, etc.)")]
    pub status: Option<String>,
}

impl ListEmployeesRequest {
    pub fn query_params(&self) -> QueryParams {
        let mut params = pagination(self.page, self.per_page, LIST_PER_PAGE_CAP);
        push_text(&mut params, "department", self.department.as_deref());
        push_text(&mut params, "status", self.status.as_deref());
        params
    }
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetEmployeeRequest {
    #[schemars(description = "The unique Breathe HR ID of the employee, e.g. 1234")]
    pub employee_id: u64,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchEmployeesRequest {
    #[schemars(description = "Search query matched against name, email and other attributes")]
    pub query: String,
    #[serde(default = "default_page")]
    #[schemars(description = "Page number for pagination (default: 1)")]
    pub page: u32,
    #[serde(default = "default_search_per_page")]
    #[schemars(description = "Number of results per page (default: 20, max: 50)")]
    pub per_page: u32,
}

impl SearchEmployeesRequest {
    pub fn query_params(&self) -> QueryParams {
        let mut params = vec![("query", self.query.clone())];
        params.extend(pagination(self.page, self.per_page, SEARCH_PER_PAGE_CAP));
        params
    }
}

pub async fn list_employees(
    client: &BreatheClient,
    Parameters(args): Parameters<ListEmployeesRequest>,
) -> Result<Value, BreatheError> {
    info!(page = args.page, per_page = args.per_page, "listing employees");
    client.get("employees", Some(&args.query_params())).await
}

pub async fn get_employee(
    client: &BreatheClient,
    Parameters(args): Parameters<GetEmployeeRequest>,
) -> Result<Value, BreatheError> {
    client
        .get(&format!("employees/{}", args.employee_id), None)
        .await
}

pub async fn search_employees(
    client: &BreatheClient,
    Parameters(args): Parameters<SearchEmployeesRequest>,
) -> Result<Value, BreatheError> {
    client
        .get("employees/search", Some(&args.query_params()))
        .await
}
