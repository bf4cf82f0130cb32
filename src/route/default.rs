use async_trait::async_trait;

use crate::error::{RestError, RouterError};
use crate::http_status::client_error;
use crate::request::RouterEvent;
use crate::response::RouterResponse;
use crate::route::Route;

/// Matches all requests and raises the same REST error every time.
/// The stock default route returns a 404 response.
#[derive(Debug, Clone)]
pub struct DefaultRoute {
	pub status_code: u16,
	pub message: String,
}

impl DefaultRoute {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_response(status_code: u16, message: impl Into<String>) -> Self {
		DefaultRoute {
			status_code,
			message: message.into(),
		}
	}
}

impl Default for DefaultRoute {
	fn default() -> Self {
		DefaultRoute {
			status_code: client_error::NOT_FOUND,
			message: "Resource not found.  There are no matching paths.  Check the API documentation."
				.to_string(),
		}
	}
}

#[async_trait]
impl Route for DefaultRoute {
	fn matches(&self, _evt: &RouterEvent) -> bool {
		true
	}

	fn has_handler(&self) -> bool {
		true
	}

	async fn handle(&self, _evt: RouterEvent) -> Result<Option<RouterResponse>, RouterError> {
		Err(RestError::with_message(self.status_code, self.message.clone()).into())
	}
}
