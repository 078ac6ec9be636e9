//! Static header-injection configuration.
//!
//! `--header "Key=Value"` arguments become a header set merged into every
//! outbound call, applied after the engine's own headers. Typically used
//! for static credentials; the engine itself knows nothing about auth.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::{GantryError, Result};

/// Parse repeated `Key=Value` arguments into a header map.
///
/// Repeated keys are kept as repeated headers.
pub fn parse_header_args(args: &[String]) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    for arg in args {
        let Some((key, value)) = arg.split_once('=') else {
            return Err(GantryError::Configuration(format!(
                "invalid header format: {arg} (expected 'key=value')"
            )));
        };
        let key = key.trim();
        let value = value.trim();

        let name =
            HeaderName::from_bytes(key.as_bytes()).map_err(|err| GantryError::InvalidHeader {
                name: key.to_string(),
                message: err.to_string(),
            })?;
        let value = HeaderValue::from_str(value).map_err(|err| GantryError::InvalidHeader {
            name: key.to_string(),
            message: err.to_string(),
        })?;
        headers.append(name, value);
    }

    Ok(headers)
}
