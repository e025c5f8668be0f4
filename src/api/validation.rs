use std::str::FromStr;

use super::ApiError;
use crate::domain::{ParseEnumError, non_blank};

pub const DEFAULT_FEATURED_LIMIT: u64 = 12;

pub fn validate_limit(limit: u64) -> Result<u64, ApiError> {
    const MAX_LIMIT: u64 = 100;
    const MIN_LIMIT: u64 = 1;

    if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
        return Err(ApiError::validation(format!(
            "Invalid limit: {}. Limit must be between {} and {}",
            limit, MIN_LIMIT, MAX_LIMIT
        )));
    }
    Ok(limit)
}

/// Parses an optional query filter; blank means "no filter".
pub fn parse_filter<T>(raw: Option<&str>) -> Result<Option<T>, ApiError>
where
    T: FromStr<Err = ParseEnumError>,
{
    non_blank(raw)
        .map(str::parse::<T>)
        .transpose()
        .map_err(|e| ApiError::validation(e.to_string()))
}

/// Only same-site relative paths are accepted as post-login redirects.
///
/// Browsers read `\` as `/`, so `/\host` is as much a protocol-relative URL
/// as `//host`; backslashes and control characters are refused anywhere.
#[must_use]
pub fn safe_redirect(target: Option<&str>, fallback: &str) -> String {
    match non_blank(target) {
        Some(path) if is_local_path(path) => path.to_string(),
        _ => fallback.to_string(),
    }
}

fn is_local_path(path: &str) -> bool {
    let mut chars = path.chars();
    chars.next() == Some('/')
        && !matches!(chars.next(), Some('/' | '\\'))
        && !path.chars().any(|c| c == '\\' || c.is_control())
}
