//! HTTP client and API communication layer for Breathe HR.
//!
//! This module handles all HTTP communication with the Breathe HR REST API,
//! including authentication, request construction, and response handling.

mod client;

// Re-export client's public API
pub use client::{BreatheClient, QueryParams};

// Re-export common types used in our public API
pub use reqwest::Method;
