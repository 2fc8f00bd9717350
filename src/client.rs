pub mod response;

pub use self::response::{Links, Pagination, Response};

use crate::error::{ApiError, ApiResult};

use gitlab::api::{self as gitlab_api, QueryParams};
use http::{
	header::{HeaderName, HeaderValue, ACCEPT},
	Method,
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

/// The request handed to [`RequestOptionFunc`]s and sent by [`Client::send`].
pub type Request = http::Request<Vec<u8>>;

/// A function altering a request before it is sent (headers, query, extensions).
pub type RequestOptionFunc = Box<dyn FnOnce(&mut Request) -> ApiResult<()> + Send>;

const SUDO: &str = "sudo";

/// Request building and response decoding on top of a Gitlab REST client.
///
/// Every [`gitlab::api::Client`] gets it for free: the client resolves urls,
/// authenticates and performs the HTTP exchange, this trait does the rest.
/// Services can be used concurrently as long as the client is `Sync`.
pub trait Client: gitlab_api::Client {
	/// Build a request for `endpoint` with the given query parameters and
	/// apply each request option, in order.
	fn new_request<I>(
		&self,
		method: Method,
		endpoint: &str,
		params: &QueryParams,
		options: I,
	) -> ApiResult<Request>
	where
		I: IntoIterator<Item = RequestOptionFunc>,
	{
		let mut url = self.rest_endpoint(endpoint)?;
		params.add_to_url(&mut url);
		if url.query() == Some("") {
			url.set_query(None);
		}

		let mut request = http::Request::builder()
			.method(method)
			.uri(url.as_str())
			.header(ACCEPT, "application/json")
			.body(Vec::new())?;

		for option in options {
			option(&mut request)?;
		}
		Ok(request)
	}

	/// Send the request through the underlying client and return the raw
	/// response, whatever its status.
	fn send(&self, request: Request) -> ApiResult<http::Response<Vec<u8>>> {
		let (parts, body) = request.into_parts();
		debug!(method = %parts.method, uri = %parts.uri, "sending request");

		let mut builder = http::Request::builder()
			.method(parts.method)
			.uri(parts.uri)
			.version(parts.version);
		if let Some(headers) = builder.headers_mut() {
			*headers = parts.headers;
		}
		if let Some(extensions) = builder.extensions_mut() {
			*extensions = parts.extensions;
		}

		let (parts, body) = self.rest(builder, body)?.into_parts();
		debug!(status = %parts.status, size = body.len(), "received response");
		Ok(http::Response::from_parts(parts, body.to_vec()))
	}

	/// Send the request and decode a successful JSON body. An empty body
	/// decodes as `null`.
	fn execute<T>(&self, request: Request) -> ApiResult<(T, Response)>
	where
		T: DeserializeOwned,
	{
		let uri = request.uri().to_string();
		let (parts, body) = self.send(request)?.into_parts();
		let response = Response::new(parts.status, parts.headers);

		if !response.status.is_success() {
			let message = error_message(&body);
			warn!(%uri, status = %response.status, %message, "request failed");
			return Err(ApiError::Gitlab { response, message });
		}

		let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
			b"null"
		} else {
			&body
		};
		match serde_json::from_slice(body) {
			Ok(value) => Ok((value, response)),
			Err(source) => Err(ApiError::Json { response, source }),
		}
	}
}

impl<C> Client for C where C: gitlab_api::Client {}

/// Extract the error message of a Gitlab error payload.
fn error_message(body: &[u8]) -> String {
	let message = serde_json::from_slice::<serde_json::Value>(body)
		.ok()
		.and_then(|value| {
			value
				.get("message")
				.or_else(|| value.get("error"))
				.map(|message| match message {
					serde_json::Value::String(s) => s.to_owned(),
					other => other.to_string(),
				})
		});
	message.unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_owned())
}

/// Set a header on the request.
pub fn with_header(name: &str, value: &str) -> RequestOptionFunc {
	let name = name.to_owned();
	let value = value.to_owned();
	Box::new(move |request| {
		let name = HeaderName::from_bytes(name.as_bytes()).map_err(http::Error::from)?;
		let value = HeaderValue::from_str(&value).map_err(http::Error::from)?;
		request.headers_mut().insert(name, value);
		Ok(())
	})
}

/// Run the request as another user (administrators only).
pub fn with_sudo(user: &str) -> RequestOptionFunc {
	with_header(SUDO, user)
}

/// Append a query parameter to the request url.
pub fn with_query(key: &str, value: &str) -> RequestOptionFunc {
	let key = key.to_owned();
	let value = value.to_owned();
	Box::new(move |request| {
		let mut url = Url::parse(&request.uri().to_string())?;
		url.query_pairs_mut().append_pair(&key, &value);
		*request.uri_mut() = url.as_str().parse().map_err(http::Error::from)?;
		Ok(())
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use bytes::Bytes;
	use http::StatusCode;
	use serde::Deserialize;

	struct Fixed {
		status: StatusCode,
		body: &'static str,
	}

	impl gitlab_api::RestClient for Fixed {
		type Error = std::io::Error;

		fn rest_endpoint(&self, endpoint: &str) -> Result<Url, gitlab_api::ApiError<Self::Error>> {
			Ok(Url::parse("https://gitlab.example.com/api/v4/")?.join(endpoint)?)
		}
	}

	impl gitlab_api::Client for Fixed {
		fn rest(
			&self,
			_request: http::request::Builder,
			_body: Vec<u8>,
		) -> Result<http::Response<Bytes>, gitlab_api::ApiError<Self::Error>> {
			Ok(http::Response::builder()
				.status(self.status)
				.body(Bytes::from_static(self.body.as_bytes()))
				.unwrap())
		}
	}

	#[derive(Deserialize, Debug)]
	struct Item {
		id: u64,
	}

	fn request(client: &Fixed) -> Request {
		client
			.new_request(Method::GET, "items", &QueryParams::default(), Vec::new())
			.unwrap()
	}

	#[test]
	fn new_request_without_params() {
		let client = Fixed {
			status: StatusCode::OK,
			body: "[]",
		};
		let request = request(&client);
		assert_eq!(request.method(), Method::GET);
		assert_eq!(
			request.uri().to_string(),
			"https://gitlab.example.com/api/v4/items"
		);
		assert_eq!(request.headers()[ACCEPT], "application/json");
	}

	#[test]
	fn request_options() {
		let client = Fixed {
			status: StatusCode::OK,
			body: "[]",
		};
		let mut params = QueryParams::default();
		params.push("page", 2u64);
		let request = client
			.new_request(
				Method::GET,
				"items",
				&params,
				vec![
					with_sudo("root"),
					with_header("x-custom", "1"),
					with_query("search", "ci token"),
				],
			)
			.unwrap();

		assert_eq!(request.headers()[SUDO], "root");
		assert_eq!(request.headers()["x-custom"], "1");
		assert_eq!(request.uri().query(), Some("page=2&search=ci+token"));
	}

	#[test]
	fn invalid_header_rejects_request() {
		let client = Fixed {
			status: StatusCode::OK,
			body: "[]",
		};
		let err = client
			.new_request(
				Method::GET,
				"items",
				&QueryParams::default(),
				vec![with_header("bad header", "x")],
			)
			.unwrap_err();
		assert!(matches!(err, ApiError::Http(_)));
		assert!(err.response().is_none());
	}

	#[test]
	fn execute_decodes_success() {
		let client = Fixed {
			status: StatusCode::OK,
			body: r#"[{"id": 1}, {"id": 2}]"#,
		};
		let (items, response): (Vec<Item>, _) = client.execute(request(&client)).unwrap();
		assert_eq!(items.iter().map(|i| i.id).collect::<Vec<_>>(), vec![1, 2]);
		assert_eq!(response.status, StatusCode::OK);
	}

	#[test]
	fn execute_reports_gitlab_errors() {
		let client = Fixed {
			status: StatusCode::UNAUTHORIZED,
			body: r#"{"message": "401 Unauthorized"}"#,
		};
		let err = client
			.execute::<Vec<Item>>(request(&client))
			.unwrap_err();
		match &err {
			ApiError::Gitlab { message, .. } => assert_eq!(message, "401 Unauthorized"),
			other => panic!("unexpected error {:?}", other),
		}
		assert_eq!(err.response().unwrap().status, StatusCode::UNAUTHORIZED);
	}

	#[test]
	fn execute_reports_invalid_json() {
		let client = Fixed {
			status: StatusCode::OK,
			body: "{not json",
		};
		let err = client
			.execute::<Vec<Item>>(request(&client))
			.unwrap_err();
		assert!(matches!(err, ApiError::Json { .. }));
		assert_eq!(err.response().unwrap().status, StatusCode::OK);
	}

	#[test]
	fn execute_empty_body_as_null() {
		for body in ["", " \n", "null"] {
			let client = Fixed {
				status: StatusCode::OK,
				body,
			};
			let (items, _): (Option<Vec<Item>>, _) = client.execute(request(&client)).unwrap();
			assert!(items.is_none());
		}
	}

	#[test]
	fn client_errors_are_transport_errors() {
		let err: ApiError = gitlab_api::ApiError::client(std::io::Error::new(
			std::io::ErrorKind::TimedOut,
			"timed out",
		))
		.into();
		assert!(matches!(err, ApiError::Transport { .. }));
		assert!(err.response().is_none());

		let err: ApiError =
			gitlab_api::ApiError::<std::io::Error>::from(url::ParseError::EmptyHost).into();
		assert!(matches!(err, ApiError::Url(url::ParseError::EmptyHost)));
	}

	#[test]
	fn error_messages() {
		assert_eq!(error_message(br#"{"error": "insufficient_scope"}"#), "insufficient_scope");
		assert_eq!(
			error_message(br#"{"message": {"name": ["is missing"]}}"#),
			r#"{"name":["is missing"]}"#
		);
		assert_eq!(error_message(b"Bad Gateway\n"), "Bad Gateway");
	}
}
