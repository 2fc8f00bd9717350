use derive_builder::Builder;
use gitlab::api::QueryParams;

/// Pagination parameters of list endpoints.
///
/// Values are sent as is, the server decides what to do with out of range ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
#[builder(default)]
pub struct ListOptions {
	/// The page to retrieve, starting at 1.
	#[builder(setter(strip_option))]
	pub page: Option<u64>,
	/// The number of items per page.
	#[builder(setter(strip_option))]
	pub per_page: Option<u64>,
}

impl ListOptions {
	/// Create a builder for the options.
	pub fn builder() -> ListOptionsBuilder {
		ListOptionsBuilder::default()
	}

	pub(crate) fn parameters(&self) -> QueryParams<'static> {
		let mut params = QueryParams::default();
		params.push_opt("page", self.page);
		params.push_opt("per_page", self.per_page);

		params
	}
}
