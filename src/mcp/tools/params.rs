//! Helpers shared by the tools when building upstream query strings.
//!
//! Optional filters are only sent when the caller supplied a meaningful value:
//! empty strings and zero numbers count as "no filter".

use crate::mcp::http::QueryParams;

pub const fn default_page() -> u32 {
    1
}

/// Base pagination pair with `per_page` clamped to the tool's cap.
pub fn pagination(page: u32, per_page: u32, cap: u32) -> QueryParams {
    vec![
        ("page", page.to_string()),
        ("per_page", per_page.min(cap).to_string()),
    ]
}

pub fn push_text(params: &mut QueryParams, name: &'static str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        params.push((name, value.to_string()));
    }
}

pub fn push_number<N>(params: &mut QueryParams, name: &'static str, value: Option<N>)
where
    N: PartialEq + Default + ToString,
{
    if let Some(value) = value.filter(|v| *v != N::default()) {
        params.push((name, value.to_string()));
    }
}
