//! Wire structures for the inbound invocation.
//!
//! See the [API Gateway proxy integration input format](http://docs.aws.amazon.com/apigateway/latest/developerguide/api-gateway-set-up-simple-proxy.html#api-gateway-simple-proxy-for-lambda-input-format).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The raw API Gateway proxy event, exactly as the hosting environment
/// delivers it.  Use [`RouterEvent`](crate::RouterEvent) for everything
/// past the front door.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProxyEvent {
	/// The REST api resource path.  eg: `/{proxy+}`
	pub resource: String,

	/// The request URI path.  eg: `/foo/bar`
	pub path: String,

	/// GET, POST, PUT, etc...
	pub http_method: String,

	/// All headers of the request with only their first value.
	pub headers: Option<HashMap<String, String>>,

	/// All headers of the request including all values.
	pub multi_value_headers: Option<HashMap<String, Vec<String>>>,

	/// The parsed URI query parameters with only their first value.
	pub query_string_parameters: Option<HashMap<String, String>>,

	/// The parsed URI query parameters including all values.
	pub multi_value_query_string_parameters: Option<HashMap<String, Vec<String>>>,

	/// The parsed URI path parameters.
	pub path_parameters: Option<HashMap<String, String>>,

	/// Configuration attributes associated with a deployment stage of an API.
	pub stage_variables: Option<HashMap<String, String>>,

	/// API Gateway event context.
	pub request_context: RequestContext,

	/// Unparsed request body.
	pub body: Option<String>,

	/// If true the body is base64 encoded.
	pub is_base64_encoded: bool,
}

/// API Gateway context for one request: account, identity and timing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestContext {
	pub account_id: String,
	pub api_id: String,
	pub http_method: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub authorizer: Option<Value>,
	pub identity: RequestIdentity,
	pub path: String,
	pub request_id: String,
	pub request_time_epoch: i64,
	pub resource_id: String,
	pub resource_path: String,
	pub stage: String,
}

/// Who made the request, as far as API Gateway can tell.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestIdentity {
	pub access_key: Option<String>,
	pub account_id: Option<String>,
	pub api_key: Option<String>,
	pub api_key_id: Option<String>,
	pub caller: Option<String>,
	pub cognito_authentication_provider: Option<String>,
	pub cognito_authentication_type: Option<String>,
	pub cognito_identity_id: Option<String>,
	pub cognito_identity_pool_id: Option<String>,
	pub source_ip: Option<String>,
	pub user: Option<String>,
	pub user_agent: Option<String>,
	pub user_arn: Option<String>,
}

/// The opaque Lambda execution context.  The router never inspects it;
/// it is passed through to error handlers for logging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LambdaContext {
	pub function_name: String,
	pub function_version: String,
	pub invoked_function_arn: String,
	pub memory_limit_in_mb: u32,
	pub aws_request_id: String,
	pub log_group_name: String,
	pub log_stream_name: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn deserializes_a_minimal_event() {
		let evt: ProxyEvent = serde_json::from_str(
			r#"{
				"resource": "/{proxy+}",
				"path": "/foo/bar",
				"httpMethod": "GET",
				"headers": {"Host": "example.org"},
				"queryStringParameters": null,
				"body": null,
				"isBase64Encoded": false
			}"#,
		)
		.unwrap();
		assert_eq!(evt.path, "/foo/bar");
		assert_eq!(evt.http_method, "GET");
		assert_eq!(evt.headers.unwrap()["Host"], "example.org");
		assert!(evt.query_string_parameters.is_none());
		assert!(evt.body.is_none());
	}

	#[test]
	fn deserializes_the_request_context() {
		let evt: ProxyEvent = serde_json::from_str(
			r#"{
				"path": "/",
				"httpMethod": "GET",
				"requestContext": {
					"accountId": "12345678912",
					"requestId": "abc-123",
					"identity": {"sourceIp": "192.168.0.0"},
					"stage": "testStage"
				}
			}"#,
		)
		.unwrap();
		assert_eq!(evt.request_context.account_id, "12345678912");
		assert_eq!(evt.request_context.request_id, "abc-123");
		assert_eq!(evt.request_context.identity.source_ip.as_deref(), Some("192.168.0.0"));
	}
}
