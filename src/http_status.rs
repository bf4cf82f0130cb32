//! Standard HTTP status codes.
//!
//! See [RFC 7231](https://tools.ietf.org/html/rfc7231) and
//! [RFC 4918](https://tools.ietf.org/html/rfc4918).

/// Status codes for successful responses.
pub mod success {
	/// The request has succeeded.  The payload depends on the request method.
	pub const OK: u16 = 200;

	/// The request has been fulfilled and has resulted in one or more new
	/// resources being created.
	pub const CREATED: u16 = 201;

	/// The request has been accepted for processing, but the processing has
	/// not been completed.
	pub const ACCEPTED: u16 = 202;

	/// The request was successful but the enclosed payload has been modified
	/// by a transforming proxy.
	pub const NON_AUTHORITATIVE_INFORMATION: u16 = 203;

	/// The server has successfully fulfilled the request and there is no
	/// content to send in the response payload body.
	pub const NO_CONTENT: u16 = 204;

	/// The server has fulfilled the request and desires that the user agent
	/// reset the document view to its original state.
	pub const RESET_CONTENT: u16 = 205;
}

/// Status codes for redirects.  Pay special attention to which one is used
/// because they have subtle differences in browser and search engine behavior.
pub mod redirect {
	/// The target resource has more than one representation and the user
	/// agent should select one.
	pub const MULTIPLE_CHOICES: u16 = 300;

	/// The resource moved permanently.  Browsers will change POST to GET
	/// on redirect.  Include a Location header in the response.
	pub const MOVED_PERMANENTLY: u16 = 301;

	/// The resource moved temporarily.  Browsers will change POST to GET
	/// on redirect.  Include a Location header in the response.
	pub const FOUND: u16 = 302;

	/// The server is redirecting the user agent to a different resource,
	/// as indicated by a URI in the Location header.
	pub const SEE_OTHER: u16 = 303;

	/// Cache hit.  No content is sent.
	pub const NOT_MODIFIED: u16 = 304;

	/// The resource moved temporarily and browsers should resubmit,
	/// preserving the method and body.  Don't use for GET.
	pub const TEMPORARY_REDIRECT: u16 = 307;

	/// The resource moved permanently and browsers should resubmit,
	/// preserving the method and body.  Don't use for GET.
	pub const PERMANENT_REDIRECT: u16 = 308;
}

/// The client screwed up.
pub mod client_error {
	/// The request could not be understood by the server due to malformed
	/// syntax.  For example the JSON body could not be parsed.
	pub const BAD_REQUEST: u16 = 400;

	/// Authentication is required and the user is not logged in.
	pub const UNAUTHORIZED: u16 = 401;

	/// The user is authenticated but does not have permission.
	pub const FORBIDDEN: u16 = 403;

	/// The requested resource was not found.
	pub const NOT_FOUND: u16 = 404;

	/// The resource does not support the given method.  The response
	/// must include an Allow header listing the supported methods.
	pub const METHOD_NOT_ALLOWED: u16 = 405;

	/// The target resource does not have a representation acceptable to
	/// the user agent, according to the request's negotiation headers.
	pub const NOT_ACCEPTABLE: u16 = 406;

	/// The request was understood, and semantically correct, but conflicts
	/// with the current state.
	pub const CONFLICT: u16 = 409;

	/// Access to the target resource is no longer available and this
	/// condition is likely to be permanent.
	pub const GONE: u16 = 410;

	/// The server refuses to accept the request without a defined
	/// Content-Length.
	pub const LENGTH_REQUIRED: u16 = 411;

	/// The request is larger than the server is willing or able to process.
	pub const PAYLOAD_TOO_LARGE: u16 = 413;

	/// The request has a media type which the server or resource does not
	/// support.
	pub const UNSUPPORTED_MEDIA_TYPE: u16 = 415;

	/// The client has asked for a portion of the file but the server cannot
	/// supply that portion.
	pub const REQUESTED_RANGE_NOT_SATISFIABLE: u16 = 416;

	/// The expectation given in the request's Expect header could not be met.
	pub const EXPECTATION_FAILED: u16 = 417;

	/// The request is syntactically correct, but contains semantic errors.
	/// For example a string was expected but got a number.
	pub const UNPROCESSABLE_ENTITY: u16 = 422;

	/// The user has sent too many requests in a given amount of time.
	pub const TOO_MANY_REQUESTS: u16 = 429;
}

/// The server screwed up.
pub mod server_error {
	/// Generic server-side error.
	pub const INTERNAL_SERVER_ERROR: u16 = 500;

	/// Usually implies future availability.
	pub const NOT_IMPLEMENTED: u16 = 501;

	/// Received an invalid response from an inbound server it accessed
	/// while acting as a proxy.
	pub const BAD_GATEWAY: u16 = 502;

	/// A service is temporarily down.
	pub const SERVICE_UNAVAILABLE: u16 = 503;

	/// Did not receive a timely response from an upstream server while
	/// acting as a proxy.
	pub const GATEWAY_TIMEOUT: u16 = 504;
}

/// Looks up the standard reason phrase for a status code.
///
/// # Examples
///
/// ```
/// use lambda_rest_router::http_status::status_message;
///
/// assert_eq!(status_message(404), Some("Not Found"));
/// assert_eq!(status_message(299), None);
/// ```
pub fn status_message(status_code: u16) -> Option<&'static str> {
	match status_code {
		200 => Some("OK"),
		201 => Some("Created"),
		202 => Some("Accepted"),
		203 => Some("Non Authoritative Info"),
		204 => Some("No Content"),
		205 => Some("Reset Content"),
		206 => Some("Partial Content"),
		207 => Some("Multi Status"),
		208 => Some("Already Reported"),
		226 => Some("IM Used"),
		300 => Some("Multiple Choices"),
		301 => Some("Moved Permanently"),
		302 => Some("Found"),
		303 => Some("See Other"),
		304 => Some("Not Modified"),
		305 => Some("Use Proxy"),
		307 => Some("Temporary Redirect"),
		308 => Some("Permanent Redirect"),
		400 => Some("Bad Request"),
		401 => Some("Unauthorized"),
		402 => Some("Payment Required"),
		403 => Some("Forbidden"),
		404 => Some("Not Found"),
		405 => Some("Method Not Allowed"),
		407 => Some("Proxy Auth Required"),
		408 => Some("Request Timeout"),
		409 => Some("Conflict"),
		410 => Some("Gone"),
		411 => Some("Length Required"),
		412 => Some("Precondition Failed"),
		413 => Some("Payload Too Large"),
		414 => Some("Request URI Too Long"),
		415 => Some("Unsupported Media Type"),
		416 => Some("Range Not Satisfiable"),
		417 => Some("Expectation Failed"),
		422 => Some("Unprocessable Entity"),
		423 => Some("Locked"),
		424 => Some("Failed Dependency"),
		426 => Some("Upgrade Required"),
		428 => Some("Precondition Required"),
		429 => Some("Too Many Requests"),
		431 => Some("Request Header Fields Too Large"),
		451 => Some("Unavailable For Legal Reasons"),
		500 => Some("Internal Server Error"),
		501 => Some("Not Implemented"),
		502 => Some("Bad Gateway"),
		503 => Some("Service Unavailable"),
		504 => Some("Gateway Timeout"),
		505 => Some("HTTP Version Not Supported"),
		506 => Some("Variant Also Negotiates"),
		507 => Some("Insufficient Storage"),
		508 => Some("Loop Detected"),
		510 => Some("Not Extended"),
		511 => Some("Network Authentication Required"),
		_ => None,
	}
}
