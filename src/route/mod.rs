//! Routes: match predicates paired with optional handling and
//! post-processing behavior.

mod buildable;
mod default;

use std::sync::Arc;

use async_trait::async_trait;

pub use buildable::BuildableRoute;
pub use default::DefaultRoute;

use crate::error::RouterError;
use crate::request::RouterEvent;
use crate::response::RouterResponse;

/// A unit of routing behavior.
///
/// The [`Router`](crate::Router) walks its routes in registration order.
/// Every enabled route that matches gets its post-processor recorded; the
/// first matching route whose handler produces a response becomes the
/// handling route and ends the walk.  Most code should build routes with
/// [`BuildableRoute`]; implement this trait directly for reusable routes
/// with their own state (authentication, logging, proxying).
#[async_trait]
pub trait Route: Send + Sync {
	/// Whether this route wants the request.
	fn matches(&self, evt: &RouterEvent) -> bool;

	/// Disabled routes are skipped entirely, matching or not.
	fn enabled(&self) -> bool {
		true
	}

	/// Whether [`handle`](Route::handle) does anything.  Routes without a
	/// handler still post-process when matched.
	fn has_handler(&self) -> bool {
		false
	}

	/// Whether [`post_process`](Route::post_process) does anything.
	fn has_post_processor(&self) -> bool {
		false
	}

	/// Produces the response for a matched request.  Returning `Ok(None)`
	/// passes the request on to later routes; it is a supported
	/// fall-through, not an error.
	async fn handle(&self, _evt: RouterEvent) -> Result<Option<RouterResponse>, RouterError> {
		Ok(None)
	}

	/// Observes or replaces the response after a handler has produced one.
	/// `handling_routes` is the ordered list of routes that have handled
	/// or post-processed the request so far.
	async fn post_process(
		&self,
		_evt: RouterEvent,
		resp: RouterResponse,
		_handling_routes: &[Arc<dyn Route>],
	) -> Result<RouterResponse, RouterError> {
		Ok(resp)
	}
}
