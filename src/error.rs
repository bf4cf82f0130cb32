//! Error types raised while routing requests.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::http_status;

/// An error that is caught by the [`Router`](crate::Router) and turned into
/// a JSON REST response.  The status code and message are sent to the client
/// verbatim, so they must never contain internal details.
///
/// # Examples
///
/// ```
/// use lambda_rest_router::RestError;
///
/// let err = RestError::new(404);
/// assert_eq!(err.status_code(), 404);
/// assert_eq!(err.message(), "Not Found");
///
/// let err = RestError::with_message(409, "that username is taken");
/// assert_eq!(err.message(), "that username is taken");
/// ```
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct RestError {
	status_code: u16,
	message: String,
	additional_params: Map<String, Value>,
}

impl RestError {
	/// Creates an error with the standard reason phrase for `status_code`
	/// as the message.
	///
	/// # Panics
	///
	/// Panics if `status_code` is not a three digit number in 100-599.
	/// That is a wiring mistake, not a request-time condition.
	pub fn new(status_code: u16) -> Self {
		let message = http_status::status_message(status_code)
			.map(str::to_string)
			.unwrap_or_else(|| status_code.to_string());
		Self::with_message(status_code, message)
	}

	/// Creates an error with an explicit client-facing message.
	///
	/// # Panics
	///
	/// Panics if `status_code` is not a three digit number in 100-599.
	pub fn with_message(status_code: u16, message: impl Into<String>) -> Self {
		if !(100..=599).contains(&status_code) {
			panic!("illegal HTTP status code {status_code}");
		}
		Self {
			status_code,
			message: message.into(),
			additional_params: Map::new(),
		}
	}

	/// Adds an extra member to the JSON error body.  Parameters are emitted
	/// in insertion order and a parameter named `message` or `statusCode`
	/// overrides the built-in member.
	pub fn additional_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.additional_params.insert(key.into(), value.into());
		self
	}

	pub fn status_code(&self) -> u16 {
		self.status_code
	}

	pub fn message(&self) -> &str {
		&self.message
	}

	pub fn additional_params(&self) -> &Map<String, Value> {
		&self.additional_params
	}

	/// The JSON body this error renders to: `message` and `statusCode`
	/// first, then the additional params, with caller-supplied values
	/// winning on key collisions.
	pub(crate) fn to_body(&self) -> Value {
		let mut body = Map::new();
		body.insert("message".to_string(), Value::String(self.message.clone()));
		body.insert("statusCode".to_string(), Value::from(self.status_code));
		for (key, value) in &self.additional_params {
			body.insert(key.clone(), value.clone());
		}
		Value::Object(body)
	}
}

/// Any error a handler, post-processor, or serializer can raise.
///
/// [`RestError`]s are surfaced to the client as structured JSON error
/// bodies.  Everything else is logged and replaced with a generic
/// internal-error response so the message never leaks.
#[derive(Debug, Error)]
pub enum RouterError {
	/// A deliberate, client-safe REST error.
	#[error(transparent)]
	Rest(#[from] RestError),

	/// Any other failure.  The message is never sent to the client.
	#[error(transparent)]
	Unstructured(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl RouterError {
	/// Wraps an arbitrary error or message as an unstructured failure.
	pub fn unstructured(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
		Self::Unstructured(err.into())
	}
}

impl From<String> for RouterError {
	fn from(message: String) -> Self {
		Self::unstructured(message)
	}
}

impl From<&str> for RouterError {
	fn from(message: &str) -> Self {
		Self::unstructured(message.to_string())
	}
}
