//! The normalized request passed to route handlers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use percent_encoding::percent_decode_str;
use serde_json::Value;
use url::Url;

use crate::error::RestError;
use crate::event::{ProxyEvent, RequestContext};
use crate::http_status::client_error;
use crate::negotiation::is_json_media_type;

/// A scratch map for passing values between routes within one request,
/// typically from a post-processing route's match to its post-processor,
/// or from an authentication route's handler to later handlers.
///
/// Cloning a [`RouterEvent`] shares its meta, so values written through
/// one clone are visible through all of them.
#[derive(Debug, Clone, Default)]
pub struct Meta {
	values: Arc<Mutex<HashMap<String, Value>>>,
}

impl Meta {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) {
		let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
		values.insert(key.into(), value.into());
	}

	pub fn get(&self, key: &str) -> Option<Value> {
		let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
		values.get(key).cloned()
	}

	pub fn contains(&self, key: &str) -> bool {
		let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
		values.contains_key(key)
	}

	pub fn remove(&self, key: &str) -> Option<Value> {
		let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
		values.remove(key)
	}
}

/// An incoming request, normalized from the raw [`ProxyEvent`]: the path
/// is canonicalized, the body is parsed, cookies are split out, and
/// headers get a case-insensitive index.
#[derive(Debug, Clone, Default)]
pub struct RouterEvent {
	pub request_context: RequestContext,

	/// Request headers with their original casing, first value only.
	pub headers: HashMap<String, String>,

	/// Request headers with their original casing, all values.
	pub multi_value_headers: HashMap<String, Vec<String>>,

	/// The uppercase HTTP verb.  eg: `GET`
	pub http_method: String,

	/// Scratch space scoped to this request.
	pub meta: Meta,

	/// The canonicalized request path.  eg: `/foo/bar`
	pub path: String,

	/// Parameters extracted from the path by the matched route's pattern,
	/// merged over any parameters the hosting environment supplied.
	pub path_parameters: HashMap<String, String>,

	pub query_string_parameters: HashMap<String, String>,
	pub multi_value_query_string_parameters: HashMap<String, Vec<String>>,
	pub stage_variables: HashMap<String, String>,

	/// The parsed request body.  JSON bodies (by Content-Type, or when no
	/// Content-Type is set) are parsed into their value; anything else is
	/// a string.  `Null` when there is no body.
	pub body: Value,

	/// The body exactly as it arrived, before any parsing or decoding.
	pub body_raw: Option<String>,

	/// Cookies parsed from the `Cookie` header.
	pub cookies: HashMap<String, String>,

	// Lowercase-keyed mirrors, built once, for case-insensitive lookup.
	headers_lower_case: HashMap<String, String>,
	multi_value_headers_lower_case: HashMap<String, Vec<String>>,
}

impl RouterEvent {
	/// Normalizes a raw proxy event.  Failures (an unparseable path, a
	/// malformed JSON body, a malformed Cookie header) are client errors.
	pub fn from_proxy_event(evt: &ProxyEvent) -> Result<Self, RestError> {
		let headers = evt.headers.clone().unwrap_or_default();
		let multi_value_headers = evt.multi_value_headers.clone().unwrap_or_default();
		let headers_lower_case: HashMap<String, String> = headers
			.iter()
			.map(|(key, value)| (key.to_lowercase(), value.clone()))
			.collect();
		let multi_value_headers_lower_case: HashMap<String, Vec<String>> = multi_value_headers
			.iter()
			.map(|(key, values)| (key.to_lowercase(), values.clone()))
			.collect();

		let content_type = headers_lower_case.get("content-type");
		let (body, body_raw) = parse_body(evt, content_type.map(String::as_str))?;

		let cookies = match headers_lower_case.get("cookie") {
			Some(header) => parse_cookies(header)?,
			None => HashMap::new(),
		};

		Ok(RouterEvent {
			request_context: evt.request_context.clone(),
			headers,
			multi_value_headers,
			http_method: evt.http_method.to_uppercase(),
			meta: Meta::new(),
			path: canonicalize_path(&evt.path)?,
			path_parameters: evt.path_parameters.clone().unwrap_or_default(),
			query_string_parameters: evt.query_string_parameters.clone().unwrap_or_default(),
			multi_value_query_string_parameters: evt.multi_value_query_string_parameters.clone().unwrap_or_default(),
			stage_variables: evt.stage_variables.clone().unwrap_or_default(),
			body,
			body_raw,
			cookies,
			headers_lower_case,
			multi_value_headers_lower_case,
		})
	}

	/// Fetches a header value, ignoring case.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers_lower_case.get(&name.to_lowercase()).map(String::as_str)
	}

	/// Fetches all values of a header, ignoring case.
	pub fn multi_value_header(&self, name: &str) -> Option<&[String]> {
		self.multi_value_headers_lower_case
			.get(&name.to_lowercase())
			.map(Vec::as_slice)
	}

	/// Requires that the query parameter is set, raising a 400 otherwise.
	pub fn require_query_param(&self, name: &str) -> Result<&str, RestError> {
		self.query_string_parameters
			.get(name)
			.map(String::as_str)
			.ok_or_else(|| {
				RestError::with_message(
					client_error::BAD_REQUEST,
					format!("Required query parameter '{name}' is not set."),
				)
			})
	}

	/// Requires that the query parameter is set to one of the given values.
	pub fn require_query_param_in(&self, name: &str, values: &[&str]) -> Result<&str, RestError> {
		let value = self.require_query_param(name)?;
		if !values.contains(&value) {
			return Err(RestError::with_message(
				client_error::BAD_REQUEST,
				format!("Required query parameter '{name}' must be one of: {}.", values.join(", ")),
			));
		}
		Ok(value)
	}

	/// Requires that the query parameter is set and satisfies the predicate.
	pub fn require_query_param_matching(
		&self,
		name: &str,
		predicate: impl Fn(&str) -> bool,
	) -> Result<&str, RestError> {
		let value = self.require_query_param(name)?;
		if !predicate(value) {
			return Err(RestError::with_message(
				client_error::BAD_REQUEST,
				format!("Required query parameter '{name}' is not a legal value."),
			));
		}
		Ok(value)
	}

	/// Requires that the header is set, raising a 400 otherwise.
	pub fn require_header(&self, name: &str) -> Result<&str, RestError> {
		self.header(name).ok_or_else(|| {
			RestError::with_message(
				client_error::BAD_REQUEST,
				format!("Required header '{name}' is not set."),
			)
		})
	}
}

/// Canonicalizes a raw request path: dot segments are resolved (clamping
/// at the root) and runs of slashes collapse to one.  Trailing slashes
/// are preserved.
pub(crate) fn canonicalize_path(raw_path: &str) -> Result<String, RestError> {
	let absolute = if raw_path.starts_with('/') {
		format!("http://host{raw_path}")
	} else {
		format!("http://host/{raw_path}")
	};
	let url = Url::parse(&absolute).map_err(|err| {
		RestError::with_message(client_error::BAD_REQUEST, format!("Unable to parse request path: {err}"))
	})?;

	let mut path = url.path().to_string();
	while path.contains("//") {
		path = path.replace("//", "/");
	}
	Ok(path)
}

fn parse_body(evt: &ProxyEvent, content_type: Option<&str>) -> Result<(Value, Option<String>), RestError> {
	let Some(raw) = &evt.body else {
		return Ok((Value::Null, None));
	};

	if content_type.is_none() || content_type.is_some_and(is_json_media_type) {
		let text = if evt.is_base64_encoded {
			let bytes = BASE64.decode(raw).map_err(|err| {
				RestError::with_message(
					client_error::BAD_REQUEST,
					format!("Unable to decode base64 body: {err}"),
				)
			})?;
			String::from_utf8(bytes).map_err(|err| {
				RestError::with_message(
					client_error::BAD_REQUEST,
					format!("Unable to decode base64 body: {err}"),
				)
			})?
		} else {
			raw.clone()
		};
		let body = serde_json::from_str(&text).map_err(|err| {
			RestError::with_message(client_error::BAD_REQUEST, format!("Unable to parse JSON body: {err}"))
		})?;
		return Ok((body, Some(raw.clone())));
	}

	Ok((Value::String(raw.clone()), Some(raw.clone())))
}

fn parse_cookies(header: &str) -> Result<HashMap<String, String>, RestError> {
	let mut cookies = HashMap::new();
	for pair in header.split(';') {
		let pair = pair.trim();
		if pair.is_empty() {
			continue;
		}
		let Some((name, value)) = pair.split_once('=') else {
			return Err(RestError::with_message(
				client_error::BAD_REQUEST,
				format!("Unable to parse malformed cookie '{pair}'."),
			));
		};
		let mut value = value.trim();
		if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
			value = &value[1..value.len() - 1];
		}
		let decoded = percent_decode_str(value).decode_utf8_lossy().into_owned();
		cookies.entry(name.trim().to_string()).or_insert(decoded);
	}
	Ok(cookies)
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn event_with_body(body: &str, content_type: Option<&str>) -> ProxyEvent {
		ProxyEvent {
			path: "/".to_string(),
			http_method: "POST".to_string(),
			headers: content_type.map(|ct| HashMap::from([("Content-Type".to_string(), ct.to_string())])),
			body: Some(body.to_string()),
			..Default::default()
		}
	}

	#[test]
	fn canonicalizes_paths() {
		let cases = [
			("/foo/bar", "/foo/bar"),
			("//foo/bar", "/foo/bar"),
			("/foo//bar", "/foo/bar"),
			("/foo///bar", "/foo/bar"),
			("/foo/bar/", "/foo/bar/"),
			("/foo/bar//", "/foo/bar/"),
			("/foo/./bar", "/foo/bar"),
			("/foo/../bar", "/bar"),
			("/foo/bar/baz/..", "/foo/bar/"),
			("/foo/bar/../../../..", "/"),
			("/", "/"),
		];
		for (raw, canonical) in cases {
			assert_eq!(canonicalize_path(raw).unwrap(), canonical, "path {raw:?}");
		}
	}

	#[test]
	fn canonicalization_is_idempotent() {
		for raw in ["/foo/bar", "/foo/bar/", "/", "/a/b/c"] {
			let once = canonicalize_path(raw).unwrap();
			assert_eq!(canonicalize_path(&once).unwrap(), once);
		}
	}

	#[test]
	fn headers_are_fetched_case_insensitively() {
		let evt = ProxyEvent {
			path: "/".to_string(),
			http_method: "GET".to_string(),
			headers: Some(HashMap::from([("X-Custom-Header".to_string(), "yes".to_string())])),
			..Default::default()
		};
		let evt = RouterEvent::from_proxy_event(&evt).unwrap();
		assert_eq!(evt.header("X-Custom-Header"), Some("yes"));
		assert_eq!(evt.header("x-custom-header"), Some("yes"));
		assert_eq!(evt.header("X-CUSTOM-HEADER"), Some("yes"));
		assert_eq!(evt.header("X-Other-Header"), None);
	}

	#[test]
	fn json_bodies_are_parsed() {
		let evt = event_with_body(r#"{"a":"alpha"}"#, Some("application/json"));
		let evt = RouterEvent::from_proxy_event(&evt).unwrap();
		assert_eq!(evt.body, json!({"a": "alpha"}));
		assert_eq!(evt.body_raw.as_deref(), Some(r#"{"a":"alpha"}"#));
	}

	#[test]
	fn bodies_without_a_content_type_are_parsed_as_json() {
		let evt = event_with_body(r#"{"a":"alpha"}"#, None);
		let evt = RouterEvent::from_proxy_event(&evt).unwrap();
		assert_eq!(evt.body["a"], "alpha");
	}

	#[test]
	fn malformed_json_bodies_are_client_errors() {
		let evt = event_with_body("{so much not json", Some("application/json"));
		let err = RouterEvent::from_proxy_event(&evt).unwrap_err();
		assert_eq!(err.status_code(), 400);
		assert!(err.message().starts_with("Unable to parse JSON body"), "{}", err.message());
	}

	#[test]
	fn non_json_bodies_are_kept_as_strings() {
		let evt = event_with_body("{so much not json", Some("text/plain"));
		let evt = RouterEvent::from_proxy_event(&evt).unwrap();
		assert_eq!(evt.body, json!("{so much not json"));
	}

	#[test]
	fn base64_json_bodies_are_decoded_then_parsed() {
		let mut evt = event_with_body("eyJhIjoiYWxwaGEifQ==", Some("application/json"));
		evt.is_base64_encoded = true;
		let evt = RouterEvent::from_proxy_event(&evt).unwrap();
		assert_eq!(evt.body, json!({"a": "alpha"}));
	}

	#[test]
	fn http_methods_are_uppercased() {
		let evt = ProxyEvent {
			path: "/".to_string(),
			http_method: "get".to_string(),
			..Default::default()
		};
		let evt = RouterEvent::from_proxy_event(&evt).unwrap();
		assert_eq!(evt.http_method, "GET");
	}

	#[test]
	fn cookies_are_parsed() {
		let cookies = parse_cookies("session=abc123; theme=dark; motto=%22onwards%22").unwrap();
		assert_eq!(cookies["session"], "abc123");
		assert_eq!(cookies["theme"], "dark");
		assert_eq!(cookies["motto"], "\"onwards\"");
	}

	#[test]
	fn quoted_cookie_values_are_unwrapped() {
		let cookies = parse_cookies("motto=\"semper fi\"").unwrap();
		assert_eq!(cookies["motto"], "semper fi");
	}

	#[test]
	fn duplicate_cookie_names_keep_the_first_value() {
		let cookies = parse_cookies("a=1; a=2").unwrap();
		assert_eq!(cookies["a"], "1");
	}

	#[test]
	fn malformed_cookies_are_client_errors() {
		let err = parse_cookies("not a cookie").unwrap_err();
		assert_eq!(err.status_code(), 400);
	}

	#[test]
	fn meta_recovers_from_a_poisoned_lock() {
		let meta = Meta::new();
		meta.insert("k", "v");

		let values = meta.values.clone();
		std::thread::spawn(move || {
			let _guard = values.lock().unwrap();
			panic!("poison the lock");
		})
		.join()
		.unwrap_err();

		assert_eq!(meta.get("k"), Some(json!("v")));
		meta.insert("k2", 2);
		assert!(meta.contains("k2"));
	}

	#[test]
	fn meta_is_shared_between_clones() {
		let evt = RouterEvent::default();
		let clone = evt.clone();
		evt.meta.insert("seen", true);
		assert_eq!(clone.meta.get("seen"), Some(json!(true)));
	}

	#[test]
	fn require_query_param_variants() {
		let evt = RouterEvent {
			query_string_parameters: HashMap::from([
				("a".to_string(), "a".to_string()),
				("b".to_string(), "b".to_string()),
			]),
			..Default::default()
		};

		assert_eq!(evt.require_query_param("a").unwrap(), "a");
		assert!(evt.require_query_param("c").is_err());

		assert_eq!(evt.require_query_param_in("a", &["a", "alpha", "aleph"]).unwrap(), "a");
		assert!(evt.require_query_param_in("b", &[]).is_err());
		assert!(evt.require_query_param_in("b", &["beta"]).is_err());
		assert!(evt.require_query_param_in("c", &["c", "charlie"]).is_err());

		assert_eq!(evt.require_query_param_matching("a", |_| true).unwrap(), "a");
		assert_eq!(evt.require_query_param_matching("a", |a| a == "a").unwrap(), "a");
		assert!(evt.require_query_param_matching("b", |_| false).is_err());
		assert!(evt.require_query_param_matching("b", |b| b != "b").is_err());
		assert!(evt.require_query_param_matching("c", |_| true).is_err());
	}

	#[test]
	fn require_header() {
		let evt = ProxyEvent {
			path: "/".to_string(),
			http_method: "GET".to_string(),
			headers: Some(HashMap::from([("Authorization".to_string(), "Bearer x".to_string())])),
			..Default::default()
		};
		let evt = RouterEvent::from_proxy_event(&evt).unwrap();
		assert_eq!(evt.require_header("authorization").unwrap(), "Bearer x");
		assert!(evt.require_header("X-Api-Key").is_err());
	}
}
