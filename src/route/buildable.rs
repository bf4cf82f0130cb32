use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use indexmap::IndexMap;
use regex::Regex;

use crate::error::RouterError;
use crate::negotiation::negotiate_media_type;
use crate::pattern::PathPattern;
use crate::request::RouterEvent;
use crate::response::{Body, RouterResponse};
use crate::route::Route;

type HandlerFn =
	Arc<dyn Fn(RouterEvent) -> BoxFuture<'static, Result<Option<RouterResponse>, RouterError>> + Send + Sync>;
type PostProcessorFn = Arc<
	dyn Fn(
			RouterEvent,
			RouterResponse,
			Vec<Arc<dyn Route>>,
		) -> BoxFuture<'static, Result<Option<RouterResponse>, RouterError>>
		+ Send
		+ Sync,
>;
type SerializerFn = Arc<dyn Fn(Body) -> BoxFuture<'static, Result<String, RouterError>> + Send + Sync>;

/// A route assembled from chainable parts: a path pattern or regex, a
/// method, response serializers keyed by media type, a handler, and a
/// post-processor.
///
/// Each part may be configured at most once; configuring a part twice is
/// a wiring mistake and panics immediately.
///
/// # Examples
///
/// ```
/// use lambda_rest_router::{BuildableRoute, RouterResponse};
/// use serde_json::json;
///
/// let route = BuildableRoute::new()
/// 	.path("/books/{bookId}")
/// 	.method("GET")
/// 	.handler(|evt| async move {
/// 		let book_id = evt.path_parameters["bookId"].clone();
/// 		Ok(Some(RouterResponse::json(json!({"bookId": book_id}))))
/// 	});
/// ```
#[derive(Clone, Default)]
pub struct BuildableRoute {
	pattern: Option<PathPattern>,
	method: Option<String>,
	serializers: Option<IndexMap<String, SerializerFn>>,
	handler: Option<HandlerFn>,
	post_processor: Option<PostProcessorFn>,
	enabled: bool,
}

impl BuildableRoute {
	pub fn new() -> Self {
		BuildableRoute {
			enabled: true,
			..Default::default()
		}
	}

	/// Sets the path pattern.  Literal segments match case-insensitively;
	/// `{name}` placeholders each match one segment and surface in
	/// [`RouterEvent::path_parameters`] under the name and the 1-based
	/// capture index.
	///
	/// # Panics
	///
	/// Panics if a path or regex is already set, or the pattern does not
	/// compile.
	pub fn path(mut self, path: &str) -> Self {
		if self.pattern.is_some() {
			panic!("path is already defined");
		}
		self.pattern = Some(
			PathPattern::compile(path).unwrap_or_else(|err| panic!("invalid path pattern {path:?}: {err}")),
		);
		self
	}

	/// Sets a raw regex to match the canonical path against.  Captures
	/// surface in `path_parameters` under their 1-based index.
	///
	/// # Panics
	///
	/// Panics if a path or regex is already set.
	pub fn regex(mut self, regex: Regex) -> Self {
		if self.pattern.is_some() {
			panic!("path is already defined");
		}
		self.pattern = Some(PathPattern::from_regex(regex));
		self
	}

	/// Requires an exact match on the HTTP method.
	///
	/// # Panics
	///
	/// Panics if a method is already set.
	pub fn method(mut self, method: &str) -> Self {
		if self.method.is_some() {
			panic!("method is already defined");
		}
		self.method = Some(method.to_string());
		self
	}

	/// Registers a response serializer for a media type (optionally with
	/// an embedded charset, eg `"text/plain;charset=ascii"`).  When any
	/// serializers are registered the route only matches requests whose
	/// `Accept` header negotiates to one of them; the winning serializer
	/// transforms the handler's response body and its media-type key
	/// becomes the `Content-Type`.
	///
	/// # Panics
	///
	/// Panics if a serializer for `media_type` is already registered.
	pub fn serializer<F, Fut>(mut self, media_type: &str, serializer: F) -> Self
	where
		F: Fn(Body) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<String, RouterError>> + Send + 'static,
	{
		let serializers = self.serializers.get_or_insert_with(IndexMap::new);
		if serializers.contains_key(media_type) {
			panic!("serializer for {media_type} is already defined");
		}
		serializers.insert(
			media_type.to_string(),
			Arc::new(move |body| Box::pin(serializer(body))),
		);
		self
	}

	/// Sets the handler.
	///
	/// # Panics
	///
	/// Panics if a handler is already set.
	pub fn handler<F, Fut>(mut self, handler: F) -> Self
	where
		F: Fn(RouterEvent) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<Option<RouterResponse>, RouterError>> + Send + 'static,
	{
		if self.handler.is_some() {
			panic!("handler is already defined");
		}
		self.handler = Some(Arc::new(move |evt| Box::pin(handler(evt))));
		self
	}

	/// Sets the post-processor.  It receives the request, the current
	/// response, and the ordered list of routes that have handled or
	/// post-processed the request so far; returning `Ok(None)` keeps the
	/// response unchanged.
	///
	/// # Panics
	///
	/// Panics if a post-processor is already set.
	pub fn post_processor<F, Fut>(mut self, post_processor: F) -> Self
	where
		F: Fn(RouterEvent, RouterResponse, Vec<Arc<dyn Route>>) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<Option<RouterResponse>, RouterError>> + Send + 'static,
	{
		if self.post_processor.is_some() {
			panic!("postProcessor is already defined");
		}
		self.post_processor = Some(Arc::new(move |evt, resp, handling_routes| {
			Box::pin(post_processor(evt, resp, handling_routes))
		}));
		self
	}

	/// Disabled routes are skipped by the router without matching.
	pub fn set_enabled(mut self, enabled: bool) -> Self {
		self.enabled = enabled;
		self
	}
}

#[async_trait]
impl Route for BuildableRoute {
	fn matches(&self, evt: &RouterEvent) -> bool {
		if let Some(method) = &self.method {
			if method != &evt.http_method {
				return false;
			}
		}
		if let Some(pattern) = &self.pattern {
			if !pattern.is_match(&evt.path) {
				return false;
			}
		}
		if let Some(serializers) = &self.serializers {
			if negotiate_media_type(evt.header("Accept"), serializers.keys().map(String::as_str)).is_none() {
				return false;
			}
		}
		true
	}

	fn enabled(&self) -> bool {
		self.enabled
	}

	fn has_handler(&self) -> bool {
		self.handler.is_some()
	}

	fn has_post_processor(&self) -> bool {
		self.post_processor.is_some()
	}

	async fn handle(&self, mut evt: RouterEvent) -> Result<Option<RouterResponse>, RouterError> {
		let Some(handler) = &self.handler else {
			return Ok(None);
		};

		if let Some(pattern) = &self.pattern {
			pattern.extract_params(&evt.path, &mut evt.path_parameters);
		}
		let accept = evt.header("Accept").map(str::to_string);

		let Some(mut resp) = handler(evt).await? else {
			return Ok(None);
		};

		if let Some(serializers) = &self.serializers {
			if let Some(media_type) = negotiate_media_type(accept.as_deref(), serializers.keys().map(String::as_str)) {
				let serializer = &serializers[media_type];
				let body = std::mem::take(&mut resp.body);
				resp.body = Body::Text(serializer(body).await?);
				resp.set_header("Content-Type", media_type);
			}
		}

		Ok(Some(resp))
	}

	async fn post_process(
		&self,
		evt: RouterEvent,
		resp: RouterResponse,
		handling_routes: &[Arc<dyn Route>],
	) -> Result<RouterResponse, RouterError> {
		let Some(post_processor) = &self.post_processor else {
			return Ok(resp);
		};
		match post_processor(evt, resp.clone(), handling_routes.to_vec()).await? {
			Some(replacement) => Ok(replacement),
			None => Ok(resp),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	#[should_panic(expected = "path is already defined")]
	fn setting_the_path_twice_panics() {
		let _ = BuildableRoute::new().path("/foo").path("/bar");
	}

	#[test]
	#[should_panic(expected = "path is already defined")]
	fn setting_a_path_and_a_regex_panics() {
		let _ = BuildableRoute::new().path("/foo").regex(Regex::new("^/bar$").unwrap());
	}

	#[test]
	#[should_panic(expected = "method is already defined")]
	fn setting_the_method_twice_panics() {
		let _ = BuildableRoute::new().method("GET").method("POST");
	}

	#[test]
	#[should_panic(expected = "handler is already defined")]
	fn setting_the_handler_twice_panics() {
		let _ = BuildableRoute::new()
			.handler(|_evt| async move { Ok(None) })
			.handler(|_evt| async move { Ok(None) });
	}

	#[test]
	#[should_panic(expected = "postProcessor is already defined")]
	fn setting_the_post_processor_twice_panics() {
		let _ = BuildableRoute::new()
			.post_processor(|_evt, _resp, _routes| async move { Ok(None) })
			.post_processor(|_evt, _resp, _routes| async move { Ok(None) });
	}

	#[test]
	#[should_panic(expected = "serializer for application/json is already defined")]
	fn registering_a_serializer_twice_panics() {
		let _ = BuildableRoute::new()
			.serializer("application/json", |_body| async move { Ok(String::new()) })
			.serializer("application/json", |_body| async move { Ok(String::new()) });
	}

	#[test]
	#[should_panic(expected = "invalid path pattern")]
	fn an_uncompilable_pattern_panics() {
		// Long enough to blow the compiled size limit.
		let _ = BuildableRoute::new().path(&"/{a}".repeat(100_000));
	}
}
