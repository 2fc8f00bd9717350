use crate::client::Response;

use thiserror::Error;

/// Errors raised while building, sending or decoding an API request.
#[derive(Debug, Error)]
pub enum ApiError {
	#[error("invalid url: {0}")]
	Url(#[from] url::ParseError),

	#[error("failed to build request: {0}")]
	Http(#[from] http::Error),

	#[error("request rejected: {0}")]
	RequestOption(String),

	#[error("communication with gitlab failed: {source}")]
	Transport {
		#[source]
		source: Box<dyn std::error::Error + Send + Sync>,
	},

	#[error("gitlab server error: {message} ({})", .response.status)]
	Gitlab { response: Response, message: String },

	#[error("could not parse JSON response: {source}")]
	Json {
		response: Response,
		#[source]
		source: serde_json::Error,
	},
}

impl ApiError {
	pub fn transport<E>(source: E) -> Self
	where
		E: std::error::Error + Send + Sync + 'static,
	{
		Self::Transport {
			source: Box::new(source),
		}
	}

	/// The response received before the failure, if the server answered at all.
	pub fn response(&self) -> Option<&Response> {
		match self {
			Self::Gitlab { response, .. } | Self::Json { response, .. } => Some(response),
			_ => None,
		}
	}
}

impl<E> From<gitlab::api::ApiError<E>> for ApiError
where
	E: std::error::Error + Send + Sync + 'static,
{
	fn from(err: gitlab::api::ApiError<E>) -> Self {
		match err {
			gitlab::api::ApiError::UrlParse { source } => Self::Url(source),
			err => Self::transport(err),
		}
	}
}

pub type ApiResult<T> = Result<T, ApiError>;
