//! Helpers for testing routers without a hosting environment.

use std::collections::HashMap;

use chrono::{Datelike, Utc};
use uuid::Uuid;

use crate::error::RouterError;
use crate::event::{LambdaContext, ProxyEvent, RequestContext, RequestIdentity};
use crate::response::ProxyResponse;
use crate::router::Router;

/// Creates a fake [`ProxyEvent`] for a URL (a path with an optional query
/// string) and method.  Mutate the returned event to set headers, a body,
/// or anything else the test needs.
///
/// # Examples
///
/// ```
/// use lambda_rest_router::testing::create_test_proxy_event;
///
/// let evt = create_test_proxy_event("/foo/bar?a=1&a=2&b=3", "GET");
/// assert_eq!(evt.path, "/foo/bar");
/// assert_eq!(evt.query_string_parameters.as_ref().unwrap()["a"], "2");
/// assert_eq!(evt.multi_value_query_string_parameters.as_ref().unwrap()["a"], vec!["1", "2"]);
/// ```
pub fn create_test_proxy_event(url: &str, method: &str) -> ProxyEvent {
	let (path, query) = match url.split_once('?') {
		Some((path, query)) => (path, Some(query)),
		None => (url, None),
	};

	let (query_string_parameters, multi_value_query_string_parameters) = match query {
		Some(query) => {
			// API Gateway takes the last value on duplicates.
			let mut single: HashMap<String, String> = HashMap::new();
			let mut multi: HashMap<String, Vec<String>> = HashMap::new();
			for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
				single.insert(key.to_string(), value.to_string());
				multi.entry(key.to_string()).or_default().push(value.to_string());
			}
			(Some(single), Some(multi))
		}
		None => (None, None),
	};

	ProxyEvent {
		resource: "/{proxy+}".to_string(),
		path: path.to_string(),
		http_method: method.to_string(),
		headers: None,
		multi_value_headers: None,
		query_string_parameters,
		multi_value_query_string_parameters,
		path_parameters: None,
		stage_variables: None,
		request_context: RequestContext {
			account_id: "12345678912".to_string(),
			api_id: random_string(10),
			http_method: method.to_string(),
			authorizer: None,
			identity: RequestIdentity {
				access_key: Some("abcdefg".to_string()),
				source_ip: Some("192.168.0.0".to_string()),
				user_agent: Some("PostmanRuntime/2.4.5".to_string()),
				..Default::default()
			},
			path: "/".to_string(),
			request_id: Uuid::new_v4().to_string(),
			request_time_epoch: Utc::now().timestamp_millis(),
			resource_id: random_string(6),
			resource_path: "/{proxy+}".to_string(),
			stage: "testStage".to_string(),
		},
		body: None,
		is_base64_encoded: false,
	}
}

/// Creates a fake [`LambdaContext`] consistent with the proxy event.
pub fn create_test_lambda_context(proxy_event: &ProxyEvent) -> LambdaContext {
	let now = Utc::now();
	LambdaContext {
		function_name: "lambdafunction".to_string(),
		function_version: "1.0".to_string(),
		invoked_function_arn: format!(
			"arn:aws:lambda:us-east-1:{}:function:lambdafunction",
			proxy_event.request_context.account_id,
		),
		memory_limit_in_mb: 128,
		aws_request_id: proxy_event.request_context.request_id.clone(),
		log_group_name: "/aws/lambda/lambdafunction".to_string(),
		log_stream_name: format!(
			"{}/{}/{}/[$LATEST]{}",
			now.year(),
			now.month(),
			now.day(),
			Uuid::new_v4().simple(),
		),
	}
}

/// Routes one fake event through the router, building the Lambda context
/// from the event.
pub async fn test_router(router: &Router, evt: ProxyEvent) -> Result<ProxyResponse, RouterError> {
	let ctx = create_test_lambda_context(&evt);
	router.route_proxy_event(&evt, &ctx).await
}

fn random_string(length: usize) -> String {
	// Derived from a v4 uuid so the testing module needs no extra
	// randomness dependency.
	Uuid::new_v4()
		.simple()
		.to_string()
		.chars()
		.take(length)
		.collect()
}
