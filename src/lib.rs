//! A REST request router for AWS Lambda behind the API Gateway proxy
//! integration.
//!
//! The router normalizes the raw proxy event (path canonicalization,
//! case-insensitive headers, JSON body parsing, cookies), walks the
//! registered routes in order, and serializes the winning response back
//! to the wire format.  The first matching route whose handler produces
//! a response wins; every matched route's post-processor runs afterwards
//! in reverse match order, even when a handler raised an error.
//!
//! # Examples
//!
//! ```
//! use lambda_rest_router::{BuildableRoute, Router, RouterResponse};
//! use lambda_rest_router::testing::{create_test_proxy_event, test_router};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut router = Router::new();
//! router.add_route(
//! 	BuildableRoute::new()
//! 		.path("/books/{bookId}")
//! 		.method("GET")
//! 		.handler(|evt| async move {
//! 			let book_id = evt.path_parameters["bookId"].clone();
//! 			Ok(Some(RouterResponse::json(json!({"bookId": book_id}))))
//! 		}),
//! );
//!
//! let resp = test_router(&router, create_test_proxy_event("/books/1984", "GET"))
//! 	.await
//! 	.unwrap();
//! assert_eq!(resp.status_code, 200);
//! assert_eq!(resp.body, r#"{"bookId":"1984"}"#);
//! # }
//! ```

mod error;
mod event;
pub mod http_status;
pub mod negotiation;
mod pattern;
mod request;
mod response;
mod route;
mod router;
pub mod testing;
pub mod verify;

pub use error::{RestError, RouterError};
pub use event::{LambdaContext, ProxyEvent, RequestContext, RequestIdentity};
pub use pattern::PathPattern;
pub use request::{Meta, RouterEvent};
pub use response::{Body, CookieOptions, ProxyResponse, ResponseCookie, RouterResponse, SameSite};
pub use route::{BuildableRoute, DefaultRoute, Route};
pub use router::{ErrorHandler, LoggingErrorHandler, Router};
