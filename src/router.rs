//! The dispatcher: walks routes in order, translates errors, and runs
//! post-processors.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::error::RouterError;
use crate::event::{LambdaContext, ProxyEvent};
use crate::http_status::{server_error, status_message};
use crate::request::RouterEvent;
use crate::response::{Body, ProxyResponse, RouterResponse};
use crate::route::{DefaultRoute, Route};

/// Policy for errors that are not [`RestError`](crate::RestError)s.
/// Invoked once per
/// unstructured error; returning a response substitutes it for the
/// generic internal-error response, returning `Ok(None)` falls back to
/// the generic response, and returning an error is catastrophic — it
/// propagates to the hosting environment.
#[async_trait]
pub trait ErrorHandler: Send + Sync {
	async fn handle_error(
		&self,
		err: &RouterError,
		evt: &ProxyEvent,
		ctx: &LambdaContext,
	) -> Result<Option<RouterResponse>, RouterError>;
}

/// The stock error handler: logs the error and lets the generic
/// internal-error response stand.
pub struct LoggingErrorHandler;

#[async_trait]
impl ErrorHandler for LoggingErrorHandler {
	async fn handle_error(
		&self,
		err: &RouterError,
		evt: &ProxyEvent,
		_ctx: &LambdaContext,
	) -> Result<Option<RouterResponse>, RouterError> {
		tracing::error!(
			method = %evt.http_method,
			path = %evt.path,
			error = %err,
			"error thrown during route execution"
		);
		Ok(None)
	}
}

/// Routes API Gateway proxy events to registered [`Route`]s.
///
/// Routes are evaluated in registration order.  The first matching route
/// whose handler produces a response (or raises an error) ends the walk;
/// every matched route's post-processor then runs in reverse match order,
/// whether or not an error occurred.
///
/// # Examples
///
/// ```
/// use lambda_rest_router::{BuildableRoute, Router, RouterResponse};
/// use serde_json::json;
///
/// let mut router = Router::new();
/// router.add_route(
/// 	BuildableRoute::new()
/// 		.path("/hello/{name}")
/// 		.method("GET")
/// 		.handler(|evt| async move {
/// 			let name = evt.path_parameters["name"].clone();
/// 			Ok(Some(RouterResponse::json(json!({"hello": name}))))
/// 		}),
/// );
/// ```
pub struct Router {
	routes: Vec<Arc<dyn Route>>,

	/// Handles requests no other route produced a response for.  Its
	/// contract is to always raise a "not found" REST error.
	pub default_route: Arc<dyn Route>,

	error_handler: Option<Arc<dyn ErrorHandler>>,
}

impl Router {
	pub fn new() -> Self {
		Router {
			routes: Vec::new(),
			default_route: Arc::new(DefaultRoute::new()),
			error_handler: Some(Arc::new(LoggingErrorHandler)),
		}
	}

	/// Appends a route.  Routes are evaluated in the order they are added.
	pub fn add_route(&mut self, route: impl Route + 'static) -> &mut Self {
		self.routes.push(Arc::new(route));
		self
	}

	/// Appends an already-shared route.
	pub fn add_route_arc(&mut self, route: Arc<dyn Route>) -> &mut Self {
		self.routes.push(route);
		self
	}

	pub fn routes(&self) -> &[Arc<dyn Route>] {
		&self.routes
	}

	/// Replaces the unstructured-error policy.
	pub fn set_error_handler(&mut self, error_handler: impl ErrorHandler + 'static) -> &mut Self {
		self.error_handler = Some(Arc::new(error_handler));
		self
	}

	/// Removes the unstructured-error policy; the generic internal-error
	/// response is always substituted.
	pub fn clear_error_handler(&mut self) -> &mut Self {
		self.error_handler = None;
		self
	}

	/// Routes one proxy event to a wire response.
	///
	/// The returned error is catastrophic: something escaped even the
	/// error-translation layer (a failing [`ErrorHandler`], or a response
	/// that could not be serialized) and must propagate to the hosting
	/// environment rather than be swallowed.
	pub async fn route_proxy_event(
		&self,
		pevt: &ProxyEvent,
		ctx: &LambdaContext,
	) -> Result<ProxyResponse, RouterError> {
		let resp = match RouterEvent::from_proxy_event(pevt) {
			Ok(evt) => self.dispatch(evt, pevt, ctx).await?,
			// A normalization failure short-circuits: no route is evaluated.
			Err(err) => self.error_to_router_response(err.into(), pevt, ctx).await?,
		};
		resp.into_proxy_response()
	}

	/// The callback-style calling convention for older hosting runtimes.
	/// The callback receives the error-or-result pair.
	pub async fn route_proxy_event_with_callback<F>(&self, pevt: &ProxyEvent, ctx: &LambdaContext, callback: F)
	where
		F: FnOnce(Result<ProxyResponse, RouterError>),
	{
		callback(self.route_proxy_event(pevt, ctx).await);
	}

	async fn dispatch(
		&self,
		evt: RouterEvent,
		pevt: &ProxyEvent,
		ctx: &LambdaContext,
	) -> Result<RouterResponse, RouterError> {
		let mut resp: Option<RouterResponse> = None;
		let mut handling_route: Option<Arc<dyn Route>> = None;
		let mut post_processors: Vec<Arc<dyn Route>> = Vec::new();

		for route in &self.routes {
			if resp.is_some() {
				break;
			}
			if !route.enabled() || !route.matches(&evt) {
				continue;
			}
			if route.has_post_processor() {
				post_processors.push(route.clone());
			}
			if route.has_handler() {
				handling_route = Some(route.clone());
				resp = match route.handle(evt.clone()).await {
					Ok(resp) => resp,
					Err(err) => Some(self.error_to_router_response(err, pevt, ctx).await?),
				};
			}
		}

		let mut resp = match resp {
			Some(resp) => resp,
			None => {
				handling_route = Some(self.default_route.clone());
				match self.default_route.handle(evt.clone()).await {
					Ok(Some(resp)) => resp,
					Ok(None) => {
						let err = RouterError::unstructured("the default route did not return a response");
						self.error_to_router_response(err, pevt, ctx).await?
					}
					Err(err) => self.error_to_router_response(err, pevt, ctx).await?,
				}
			}
		};

		// Post-processors run in reverse match order and are never
		// skipped, even after an error.
		let mut handling_routes: Vec<Arc<dyn Route>> = handling_route.into_iter().collect();
		while let Some(route) = post_processors.pop() {
			resp = match route.post_process(evt.clone(), resp, &handling_routes).await {
				Ok(resp) => resp,
				Err(err) => self.error_to_router_response(err, pevt, ctx).await?,
			};
			if handling_routes.last().is_none_or(|last| !Arc::ptr_eq(last, &route)) {
				handling_routes.push(route);
			}
		}

		Ok(resp)
	}

	/// Translates an error into the response the client sees.  REST errors
	/// surface verbatim; everything else goes through the error handler
	/// and falls back to a generic internal-error response.
	async fn error_to_router_response(
		&self,
		err: RouterError,
		pevt: &ProxyEvent,
		ctx: &LambdaContext,
	) -> Result<RouterResponse, RouterError> {
		if let RouterError::Rest(rest) = &err {
			return Ok(RouterResponse {
				status_code: Some(rest.status_code()),
				body: Body::Json(rest.to_body()),
				..Default::default()
			});
		}

		if let Some(error_handler) = &self.error_handler {
			if let Some(resp) = error_handler.handle_error(&err, pevt, ctx).await? {
				return Ok(resp);
			}
		}

		Ok(RouterResponse {
			status_code: Some(server_error::INTERNAL_SERVER_ERROR),
			body: Body::Json(json!({
				"message": status_message(server_error::INTERNAL_SERVER_ERROR),
				"statusCode": server_error::INTERNAL_SERVER_ERROR,
			})),
			..Default::default()
		})
	}
}

impl Default for Router {
	fn default() -> Self {
		Self::new()
	}
}
