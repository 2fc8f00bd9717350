use http::{header::LINK, HeaderMap, StatusCode};

const TOTAL: &str = "x-total";
const TOTAL_PAGES: &str = "x-total-pages";
const PER_PAGE: &str = "x-per-page";
const PAGE: &str = "x-page";
const NEXT_PAGE: &str = "x-next-page";
const PREV_PAGE: &str = "x-prev-page";

/// Metadata of an API response: everything but the decoded body.
#[derive(Debug, Clone)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub pagination: Pagination,
}

impl Response {
	pub fn new(status: StatusCode, headers: HeaderMap) -> Self {
		let pagination = Pagination::from_headers(&headers);
		Self {
			status,
			headers,
			pagination,
		}
	}

	/// The next page to request, if any.
	pub fn next_page(&self) -> Option<u64> {
		self.pagination.next_page
	}
}

/// Offset pagination headers sent back by Gitlab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
	pub total_items: Option<u64>,
	pub total_pages: Option<u64>,
	pub items_per_page: Option<u64>,
	pub current_page: Option<u64>,
	pub next_page: Option<u64>,
	pub previous_page: Option<u64>,
	pub links: Links,
}

impl Pagination {
	pub fn from_headers(headers: &HeaderMap) -> Self {
		let number = |name: &str| {
			headers
				.get(name)
				.and_then(|value| value.to_str().ok())
				.and_then(|value| value.trim().parse().ok())
		};

		Self {
			total_items: number(TOTAL),
			total_pages: number(TOTAL_PAGES),
			items_per_page: number(PER_PAGE),
			current_page: number(PAGE),
			next_page: number(NEXT_PAGE),
			previous_page: number(PREV_PAGE),
			links: Links::from_headers(headers),
		}
	}
}

/// Urls found in the `Link` header (RFC 5988).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Links {
	pub first: Option<String>,
	pub prev: Option<String>,
	pub next: Option<String>,
	pub last: Option<String>,
}

impl Links {
	pub fn from_headers(headers: &HeaderMap) -> Self {
		let mut links = Self::default();
		for value in headers.get_all(LINK) {
			let Ok(value) = value.to_str() else {
				continue;
			};
			for link in split_links(value) {
				if let Some((url, rel)) = parse_link(link) {
					match rel {
						"first" => links.first = Some(url.to_owned()),
						"prev" => links.prev = Some(url.to_owned()),
						"next" => links.next = Some(url.to_owned()),
						"last" => links.last = Some(url.to_owned()),
						_ => {}
					}
				}
			}
		}
		links
	}
}

/// Split a header value before each `<`, urls being free to hold commas.
fn split_links(value: &str) -> Vec<&str> {
	let starts: Vec<usize> = value.match_indices('<').map(|(start, _)| start).collect();
	let ends = starts.iter().skip(1).copied().chain(Some(value.len()));
	starts
		.iter()
		.zip(ends)
		.map(|(&start, end)| value[start..end].trim().trim_end_matches(','))
		.collect()
}

/// Split `<url>; rel="name"` into its url and relation.
fn parse_link(link: &str) -> Option<(&str, &str)> {
	let mut parts = link.trim().split(';');
	let url = parts
		.next()?
		.trim()
		.strip_prefix('<')?
		.strip_suffix('>')?;
	let rel = parts.find_map(|param| {
		let (key, value) = param.split_once('=')?;
		(key.trim() == "rel").then(|| value.trim().trim_matches('"'))
	})?;
	Some((url, rel))
}

#[cfg(test)]
mod tests {
	use super::*;
	use http::HeaderValue;

	#[test]
	fn pagination_headers() {
		let mut headers = HeaderMap::new();
		headers.insert(TOTAL, HeaderValue::from_static("45"));
		headers.insert(TOTAL_PAGES, HeaderValue::from_static("3"));
		headers.insert(PER_PAGE, HeaderValue::from_static("20"));
		headers.insert(PAGE, HeaderValue::from_static("1"));
		headers.insert(NEXT_PAGE, HeaderValue::from_static("2"));
		headers.insert(PREV_PAGE, HeaderValue::from_static(""));

		let response = Response::new(StatusCode::OK, headers);
		assert_eq!(
			response.pagination,
			Pagination {
				total_items: Some(45),
				total_pages: Some(3),
				items_per_page: Some(20),
				current_page: Some(1),
				next_page: Some(2),
				previous_page: None,
				links: Links::default(),
			}
		);
		assert_eq!(response.next_page(), Some(2));
	}

	#[test]
	fn no_pagination_headers() {
		let response = Response::new(StatusCode::OK, HeaderMap::new());
		assert_eq!(response.pagination, Pagination::default());
		assert_eq!(response.next_page(), None);
	}

	#[test]
	fn link_header() {
		let mut headers = HeaderMap::new();
		headers.insert(
			LINK,
			HeaderValue::from_static(
				"<https://gitlab.example.com/api/v4/personal_access_tokens?page=2&per_page=2>; rel=\"next\", \
				 <https://gitlab.example.com/api/v4/personal_access_tokens?page=1&per_page=2>; rel=\"first\", \
				 <https://gitlab.example.com/api/v4/personal_access_tokens?page=5&per_page=2>; rel=\"last\"",
			),
		);

		let links = Links::from_headers(&headers);
		assert_eq!(
			links.next.as_deref(),
			Some("https://gitlab.example.com/api/v4/personal_access_tokens?page=2&per_page=2")
		);
		assert_eq!(
			links.first.as_deref(),
			Some("https://gitlab.example.com/api/v4/personal_access_tokens?page=1&per_page=2")
		);
		assert_eq!(
			links.last.as_deref(),
			Some("https://gitlab.example.com/api/v4/personal_access_tokens?page=5&per_page=2")
		);
		assert_eq!(links.prev, None);
	}

	#[test]
	fn link_urls_with_commas() {
		let mut headers = HeaderMap::new();
		headers.insert(
			LINK,
			HeaderValue::from_static(
				"<https://gitlab.example.com/api/v4/personal_access_tokens?scopes=api,read_api&page=2>; rel=\"next\",\
				 <https://gitlab.example.com/api/v4/personal_access_tokens?scopes=api,read_api&page=1>; rel=\"prev\"",
			),
		);

		let links = Links::from_headers(&headers);
		assert_eq!(
			links.next.as_deref(),
			Some("https://gitlab.example.com/api/v4/personal_access_tokens?scopes=api,read_api&page=2")
		);
		assert_eq!(
			links.prev.as_deref(),
			Some("https://gitlab.example.com/api/v4/personal_access_tokens?scopes=api,read_api&page=1")
		);
		assert_eq!(
			split_links("<a,b>; rel=next, <c>; rel=last"),
			vec!["<a,b>; rel=next", "<c>; rel=last"]
		);
	}

	#[test]
	fn malformed_links_are_skipped() {
		assert_eq!(parse_link("https://no.brackets; rel=\"next\""), None);
		assert_eq!(parse_link("<https://no.rel>"), None);
		assert_eq!(
			parse_link(" <https://ok>; foo=bar; rel=prev"),
			Some(("https://ok", "prev"))
		);
	}
}
