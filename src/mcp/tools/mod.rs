//! MCP tools for interacting with the Breathe HR API.
//!
//! Each module implements a group of tools:
//! - `employees`: List, fetch and search employees
//! - `absences`: List absences, per-employee absences and new leave requests
//! - `account`: Account details and departments
//! - `headcount`: Count employees employed on a given date
//!
//! All tools use the shared HTTP client and error handling.

pub mod absences;
pub mod account;
pub mod employees;
pub mod headcount;
mod params;
