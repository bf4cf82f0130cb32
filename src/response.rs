//! Response types and wire serialization.

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RouterError;
use crate::http_status::success;
use crate::negotiation::{is_json_media_type, is_text_media_type};

/// The outbound wire structure handed back to the hosting environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProxyResponse {
	pub status_code: u16,
	pub headers: HashMap<String, String>,
	#[serde(skip_serializing_if = "HashMap::is_empty")]
	pub multi_value_headers: HashMap<String, Vec<String>>,
	pub body: String,
	pub is_base64_encoded: bool,
}

/// A response body before wire serialization.
#[derive(Debug, Clone)]
pub enum Body {
	/// A JSON value.  Serialized per the Content-Type rules in
	/// [`RouterResponse::into_proxy_response`].
	Json(Value),

	/// Raw bytes.  Base64-encoded on the wire unless the Content-Type
	/// names a textual media type.
	Binary(Vec<u8>),

	/// Already-serialized text, sent verbatim.  This is what a route's
	/// serializer produces.
	Text(String),
}

impl Default for Body {
	fn default() -> Self {
		Body::Json(Value::Null)
	}
}

impl From<Value> for Body {
	fn from(value: Value) -> Self {
		Body::Json(value)
	}
}

impl From<Vec<u8>> for Body {
	fn from(bytes: Vec<u8>) -> Self {
		Body::Binary(bytes)
	}
}

impl From<&str> for Body {
	fn from(value: &str) -> Self {
		Body::Json(Value::String(value.to_string()))
	}
}

impl From<String> for Body {
	fn from(value: String) -> Self {
		Body::Json(Value::String(value))
	}
}

/// The response a handler builds up, before wire serialization.
///
/// # Examples
///
/// ```
/// use lambda_rest_router::RouterResponse;
/// use serde_json::json;
///
/// let resp = RouterResponse::json(json!({"drink": "coffee"}))
/// 	.with_status(201)
/// 	.with_header("Location", "/drinks/coffee");
/// assert_eq!(resp.status_code, Some(201));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouterResponse {
	/// Defaults to 200 on the wire when unset.
	pub status_code: Option<u16>,
	pub headers: HashMap<String, String>,
	pub multi_value_headers: HashMap<String, Vec<String>>,
	pub body: Body,
	/// Cookies to set, each serialized to its own `Set-Cookie` header.
	pub cookies: IndexMap<String, ResponseCookie>,
}

impl RouterResponse {
	pub fn new() -> Self {
		Self::default()
	}

	/// A response with a JSON body.
	pub fn json(body: impl Into<Value>) -> Self {
		RouterResponse {
			body: Body::Json(body.into()),
			..Default::default()
		}
	}

	/// A response with an already-serialized text body, sent verbatim.
	pub fn text(body: impl Into<String>) -> Self {
		RouterResponse {
			body: Body::Text(body.into()),
			..Default::default()
		}
	}

	/// A response with a raw byte body.
	pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
		RouterResponse {
			body: Body::Binary(bytes.into()),
			..Default::default()
		}
	}

	pub fn with_status(mut self, status_code: u16) -> Self {
		self.status_code = Some(status_code);
		self
	}

	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.set_header(name, value);
		self
	}

	pub fn with_cookie(mut self, name: impl Into<String>, cookie: impl Into<ResponseCookie>) -> Self {
		self.cookies.insert(name.into(), cookie.into());
		self
	}

	/// Fetches a header value, ignoring case.  Single-value headers are
	/// checked first, then the first value of a multi-value header.
	pub fn header(&self, name: &str) -> Option<&str> {
		let lower = name.to_lowercase();
		if let Some((_, value)) = self.headers.iter().find(|(key, _)| key.to_lowercase() == lower) {
			return Some(value);
		}
		self.multi_value_headers
			.iter()
			.find(|(key, _)| key.to_lowercase() == lower)
			.and_then(|(_, values)| values.first())
			.map(String::as_str)
	}

	/// Sets a header value, replacing any existing value under a
	/// case-insensitive match of the name.
	pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
		let name = name.into();
		let lower = name.to_lowercase();
		self.headers.retain(|key, _| key.to_lowercase() != lower);
		self.headers.insert(name, value.into());
	}

	/// Appends a value to a multi-value header, matching any existing
	/// entry case-insensitively.
	pub fn add_multi_value_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
		let name = name.into();
		let lower = name.to_lowercase();
		let key = self
			.multi_value_headers
			.keys()
			.find(|key| key.to_lowercase() == lower)
			.cloned()
			.unwrap_or(name);
		self.multi_value_headers.entry(key).or_default().push(value.into());
	}

	/// Serializes to the wire format: cookies become `Set-Cookie` headers,
	/// the status code defaults, and the body is flattened to a string.
	///
	/// Body rules: a binary body is base64-encoded unless the Content-Type
	/// names a textual media type, in which case the bytes are sent as
	/// UTF-8 text.  A JSON body is serialized with `serde_json` — note
	/// that a plain string body therefore goes out JSON-quoted — unless
	/// the Content-Type names a non-JSON type, in which case a string body
	/// is sent verbatim.  When no Content-Type is set for a JSON body it
	/// defaults to `application/json`.
	pub fn into_proxy_response(mut self) -> Result<ProxyResponse, RouterError> {
		let cookies = std::mem::take(&mut self.cookies);
		for (name, cookie) in &cookies {
			let line = cookie.serialize(name);
			self.add_multi_value_header("Set-Cookie", line);
		}

		let content_type = self.header("Content-Type").map(str::to_string);
		let (body, is_base64_encoded) = match std::mem::take(&mut self.body) {
			Body::Binary(bytes) => match &content_type {
				Some(ct) if is_text_media_type(ct) => (String::from_utf8_lossy(&bytes).into_owned(), false),
				_ => (BASE64.encode(&bytes), true),
			},
			Body::Text(text) => (text, false),
			Body::Json(value) => {
				let stringify = |value: &Value| -> Result<String, RouterError> {
					serde_json::to_string(value).map_err(|err| RouterError::unstructured(Box::new(err)))
				};
				match &content_type {
					Some(ct) if !is_json_media_type(ct) => match value {
						Value::String(text) => (text, false),
						other => (stringify(&other)?, false),
					},
					Some(_) => (stringify(&value)?, false),
					None => {
						self.set_header("Content-Type", "application/json");
						(stringify(&value)?, false)
					}
				}
			}
		};

		Ok(ProxyResponse {
			status_code: self.status_code.unwrap_or(success::OK),
			headers: self.headers,
			multi_value_headers: self.multi_value_headers,
			body,
			is_base64_encoded,
		})
	}
}

// Everything a cookie value may not contain on the wire.
const COOKIE_VALUE: &AsciiSet = &CONTROLS
	.add(b' ')
	.add(b'"')
	.add(b',')
	.add(b';')
	.add(b'\\')
	.add(b'%');

/// A cookie to set on the response.
#[derive(Debug, Clone, Default)]
pub struct ResponseCookie {
	pub value: String,
	pub options: CookieOptions,
}

impl ResponseCookie {
	pub fn new(value: impl Into<String>) -> Self {
		ResponseCookie {
			value: value.into(),
			options: CookieOptions::default(),
		}
	}

	pub fn with_options(value: impl Into<String>, options: CookieOptions) -> Self {
		ResponseCookie {
			value: value.into(),
			options,
		}
	}

	/// Builds the `Set-Cookie` header line for this cookie.
	fn serialize(&self, name: &str) -> String {
		let mut line = format!("{}={}", name, utf8_percent_encode(&self.value, COOKIE_VALUE));
		if let Some(max_age) = self.options.max_age {
			line.push_str(&format!("; Max-Age={max_age}"));
		}
		if let Some(domain) = &self.options.domain {
			line.push_str(&format!("; Domain={domain}"));
		}
		if let Some(path) = &self.options.path {
			line.push_str(&format!("; Path={path}"));
		}
		if let Some(expires) = &self.options.expires {
			line.push_str(&format!("; Expires={}", expires.format("%a, %d %b %Y %H:%M:%S GMT")));
		}
		if self.options.http_only {
			line.push_str("; HttpOnly");
		}
		if self.options.secure {
			line.push_str("; Secure");
		}
		if let Some(same_site) = &self.options.same_site {
			line.push_str(&format!("; SameSite={same_site}"));
		}
		line
	}
}

impl From<&str> for ResponseCookie {
	fn from(value: &str) -> Self {
		ResponseCookie::new(value)
	}
}

impl From<String> for ResponseCookie {
	fn from(value: String) -> Self {
		ResponseCookie::new(value)
	}
}

/// Attributes for a `Set-Cookie` header.
#[derive(Debug, Clone, Default)]
pub struct CookieOptions {
	pub domain: Option<String>,
	pub expires: Option<DateTime<Utc>>,
	pub http_only: bool,
	pub max_age: Option<i64>,
	pub path: Option<String>,
	pub same_site: Option<SameSite>,
	pub secure: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
	Strict,
	Lax,
	None,
}

impl std::fmt::Display for SameSite {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			SameSite::Strict => write!(f, "Strict"),
			SameSite::Lax => write!(f, "Lax"),
			SameSite::None => write!(f, "None"),
		}
	}
}
