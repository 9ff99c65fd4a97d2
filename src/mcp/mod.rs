//! Breathe HR Model Context Protocol implementation.
//!
//! This crate provides MCP tools for interacting with the Breathe HR REST API.
//! The implementation is organized into:
//!
//! - `config`: Process-wide configuration read from the environment
//! - `error`: Error types and conversions
//! - `http`: HTTP client and API communication
//! - `gateway`: Axum routes, health check and the optional bearer gate
//! - `tools`: Individual MCP tools for specific Breathe HR operations
//!
//! The main entry point is `BreatheHrMcp`, which provides the MCP server
//! implementation and manages all tools.

pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod tools;

use std::sync::Arc;

use axum::http::{HeaderMap, HeaderValue, header, request};
use rmcp::{
    ErrorData, RoleServer, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Implementation, InitializeRequestParam, InitializeResult,
        ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use serde_json::Value;
use tracing::info;

use crate::mcp::{
    error::BreatheError,
    http::BreatheClient,
    tools::{
        absences::{self, EmployeeAbsencesRequest, LeaveRequest, ListAbsencesRequest},
        account,
        employees::{self, GetEmployeeRequest, ListEmployeesRequest, SearchEmployeesRequest},
        headcount::{self, HeadcountRequest},
    },
};

#[derive(Clone)]
pub struct BreatheHrMcp {
    client: Arc<BreatheClient>,
    tool_router: ToolRouter<Self>,
}

/// Copy of `headers` with credential-bearing values masked, for logging.
fn redacted(headers: &HeaderMap) -> HeaderMap {
    let mut headers = headers.clone();
    for name in [header::AUTHORIZATION, header::PROXY_AUTHORIZATION, header::COOKIE] {
        if headers.contains_key(&name) {
            headers.insert(name, HeaderValue::from_static("[redacted]"));
        }
    }
    headers
}

/// Wraps a tool's upstream JSON as structured content.
fn into_result(result: Result<Value, BreatheError>) -> Result<CallToolResult, ErrorData> {
    result.map(CallToolResult::structured).map_err(ErrorData::from)
}

#[tool_router]
impl BreatheHrMcp {
    pub fn new(client: Arc<BreatheClient>) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    // Thin delegating methods so the `tool_router` proc-macro (which scans
    // this impl block) can discover and register the tools. The actual
    // implementations live in `mcp::tools::*`.

    #[tool(
        description = "Get a list of employees from Breathe HR, with optional department and employment status filters. Returns the employees and pagination info."
    )]
    async fn list_employees(
        &self,
        params: Parameters<ListEmployeesRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        into_result(employees::list_employees(&self.client, params).await)
    }

    #[tool(description = "Get detailed information for a specific employee by their Breathe HR ID.")]
    async fn get_employee(
        &self,
        params: Parameters<GetEmployeeRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        into_result(employees::get_employee(&self.client, params).await)
    }

    #[tool(description = "Search employees by name, email, or other attributes.")]
    async fn search_employees(
        &self,
        params: Parameters<SearchEmployeesRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        into_result(employees::search_employees(&self.client, params).await)
    }

    #[tool(
        description = "Get absence/leave records from Breathe HR, optionally filtered by employee, date range (YYYY-MM-DD), absence type and status."
    )]
    async fn list_absences(
        &self,
        params: Parameters<ListAbsencesRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        into_result(absences::list_absences(&self.client, params).await)
    }

    #[tool(
        description = "Get absence records for a specific employee, optionally for a single year or absence type."
    )]
    async fn get_employee_absences(
        &self,
        params: Parameters<EmployeeAbsencesRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        into_result(absences::get_employee_absences(&self.client, params).await)
    }

    #[tool(
        description = "Create a new leave/absence request in Breathe HR. Dates are YYYY-MM-DD; half-day requests may name a 'morning' or 'afternoon' period."
    )]
    async fn create_leave_request(
        &self,
        params: Parameters<LeaveRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        into_result(absences::create_leave_request(&self.client, params).await)
    }

    #[tool(description = "Get account/company information from Breathe HR.")]
    async fn get_account_info(&self) -> Result<CallToolResult, ErrorData> {
        into_result(account::get_account_info(&self.client).await)
    }

    #[tool(description = "Get the list of departments/teams from Breathe HR.")]
    async fn get_departments(&self) -> Result<CallToolResult, ErrorData> {
        into_result(account::get_departments(&self.client).await)
    }

    #[tool(
        description = "Count the employees who were employed on a given date (YYYY-MM-DD), based on their join and leaving dates. Returns the count, the number of records checked and a summary of each employed employee."
    )]
    async fn count_employees_on_date(
        &self,
        params: Parameters<HeadcountRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        into_result(headcount::count_employees_on_date(&self.client, params).await)
    }
}

#[tool_handler]
impl ServerHandler for BreatheHrMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Breathe HR MCP Server: employees, absences, leave requests, account details, departments and headcount on a date"
                    .to_string(),
            ),
        }
    }

    async fn initialize(
        &self,
        _request: InitializeRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<InitializeResult, ErrorData> {
        if let Some(http_request_part) = context.extensions.get::<request::Parts>() {
            let initialize_headers = redacted(&http_request_part.headers);
            let initialize_uri = &http_request_part.uri;
            info!(?initialize_headers, %initialize_uri, "initialize from http server");
        }
        Ok(self.get_info())
    }
}
