//! Helpers for verifying the shape of a JSON request body.

use serde_json::Value;

use crate::error::RestError;
use crate::http_status::client_error;

/// Requires that the body is a JSON object containing every one of `keys`.
///
/// # Examples
///
/// ```
/// use lambda_rest_router::verify::require_keys;
/// use serde_json::json;
///
/// let body = json!({"username": "kit", "password": "hunter2"});
/// assert!(require_keys(&body, &["username", "password"]).is_ok());
/// assert!(require_keys(&body, &["username", "email"]).is_err());
/// ```
pub fn require_keys(body: &Value, keys: &[&str]) -> Result<(), RestError> {
	let object = require_object(body)?;
	for key in keys {
		if !object.contains_key(*key) {
			return Err(RestError::with_message(
				client_error::UNPROCESSABLE_ENTITY,
				format!("missing required member {key}"),
			));
		}
	}
	Ok(())
}

/// Requires that the body is a JSON object with no member outside `keys`.
pub fn whitelist_keys(body: &Value, keys: &[&str]) -> Result<(), RestError> {
	let object = require_object(body)?;
	for key in object.keys() {
		if !keys.contains(&key.as_str()) {
			return Err(RestError::with_message(
				client_error::UNPROCESSABLE_ENTITY,
				format!("unexpected member {key}"),
			));
		}
	}
	Ok(())
}

/// Requires that the body is a JSON object with no member named in `keys`.
pub fn blacklist_keys(body: &Value, keys: &[&str]) -> Result<(), RestError> {
	let object = require_object(body)?;
	for key in object.keys() {
		if keys.contains(&key.as_str()) {
			return Err(RestError::with_message(
				client_error::UNPROCESSABLE_ENTITY,
				format!("unexpected member {key}"),
			));
		}
	}
	Ok(())
}

fn require_object(body: &Value) -> Result<&serde_json::Map<String, Value>, RestError> {
	body.as_object().ok_or_else(|| {
		RestError::with_message(client_error::UNPROCESSABLE_ENTITY, "the body must be a JSON object")
	})
}
