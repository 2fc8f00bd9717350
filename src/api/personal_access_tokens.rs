use crate::{
	api::ListOptions,
	client::{Client, RequestOptionFunc, Response},
	error::ApiResult,
	types::PersonalAccessToken,
};

use gitlab::api::QueryParams;
use http::Method;
use std::sync::Arc;

const ENDPOINT: &str = "personal_access_tokens";

/// Personal access tokens of the Gitlab API.
///
/// The service only holds a shared handle on the client, so it can be cloned
/// and used from several threads as long as the client allows it.
pub struct PersonalAccessTokensService<C> {
	client: Arc<C>,
}

impl<C> Clone for PersonalAccessTokensService<C> {
	fn clone(&self) -> Self {
		Self {
			client: Arc::clone(&self.client),
		}
	}
}

impl<C: Client> PersonalAccessTokensService<C> {
	pub fn new(client: Arc<C>) -> Self {
		Self { client }
	}

	/// List the personal access tokens of the authenticated user.
	///
	/// Tokens come in server order, a `null` or empty body being an empty
	/// list. On failure, the response received before the error (if any) is
	/// available from [`ApiError::response`].
	///
	/// [`ApiError::response`]: crate::error::ApiError::response
	pub fn list_personal_access_tokens<I>(
		&self,
		options: Option<&ListOptions>,
		request_options: I,
	) -> ApiResult<(Vec<PersonalAccessToken>, Response)>
	where
		I: IntoIterator<Item = RequestOptionFunc>,
	{
		let params = options
			.map(ListOptions::parameters)
			.unwrap_or_else(QueryParams::default);
		let request = self
			.client
			.new_request(Method::GET, ENDPOINT, &params, request_options)?;

		let (tokens, response) = self
			.client
			.execute::<Option<Vec<PersonalAccessToken>>>(request)?;
		Ok((tokens.unwrap_or_default(), response))
	}
}
