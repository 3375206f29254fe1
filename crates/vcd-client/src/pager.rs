//! `nextPage` pagination for OpenAPI collections.
//!
//! vCD answers collection requests with one page of values and advertises
//! the following page through a `Link` header:
//!
//! ```text
//! Link: <https://vcd/cloudapi/1.0.0/roles?page=2&pageSize=128>;rel="nextPage";type="application/json"
//! ```
//!
//! [`Pager`] walks those links one request at a time.

use futures::Stream;
use serde_json::Value;
use tracing::debug;

use crate::codec::PageEnvelope;
use crate::error::Result;
use crate::request::{QueryParams, RequestMethod};
use crate::vcd_client::VcdClient;

/// Relation naming the following page.
pub const REL_NEXT_PAGE: &str = "nextPage";

/// One entry of a `Link` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub url: String,
    /// Relation names; `rel="nextPage lastPage"` yields two.
    pub rel: Vec<String>,
    pub media_type: Option<String>,
}

impl Link {
    pub fn has_rel(&self, name: &str) -> bool {
        self.rel.iter().any(|r| r == name)
    }
}

/// Parse one `Link` header value into its entries.
///
/// Entries without a `<url>` are skipped.
pub fn parse_link_header(value: &str) -> Vec<Link> {
    split_outside(value, ',')
        .into_iter()
        .filter_map(parse_link_entry)
        .collect()
}

fn parse_link_entry(entry: &str) -> Option<Link> {
    let entry = entry.trim();
    let start = entry.find('<')?;
    let end = start + entry[start..].find('>')?;
    let url = entry[start + 1..end].trim().to_string();

    let mut link = Link {
        url,
        rel: Vec::new(),
        media_type: None,
    };

    for param in split_outside(&entry[end + 1..], ';') {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"');
        match key.trim().to_ascii_lowercase().as_str() {
            "rel" => link
                .rel
                .extend(value.split_whitespace().map(str::to_string)),
            "type" => link.media_type = Some(value.to_string()),
            _ => {}
        }
    }

    Some(link)
}

/// Split on `sep` outside of `<...>` and double quotes.
fn split_outside(value: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_angle = false;
    let mut in_quote = false;
    let mut start = 0;

    for (i, ch) in value.char_indices() {
        match ch {
            '<' if !in_quote => in_angle = true,
            '>' if !in_quote => in_angle = false,
            '"' if !in_angle => in_quote = !in_quote,
            c if c == sep && !in_angle && !in_quote => {
                parts.push(&value[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&value[start..]);
    parts.into_iter().filter(|p| !p.trim().is_empty()).collect()
}

/// Iterates over the pages of one OpenAPI collection.
///
/// The query parameters apply to the first request only; every later
/// request uses the `nextPage` URL as given by the server.
pub struct Pager<'a> {
    client: &'a VcdClient,
    next_url: Option<String>,
    api_version: String,
    params: Option<QueryParams>,
    headers: Vec<(String, String)>,
    pages_fetched: usize,
}

impl<'a> Pager<'a> {
    pub fn new(
        client: &'a VcdClient,
        url: impl Into<String>,
        api_version: impl Into<String>,
        params: QueryParams,
    ) -> Self {
        Self {
            client,
            next_url: Some(url.into()),
            api_version: api_version.into(),
            params: Some(params),
            headers: Vec::new(),
            pages_fetched: 0,
        }
    }

    /// Extra headers sent with every page request (tenant context).
    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = headers;
        self
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Fetch the next page, or `None` once the last page has been read.
    pub async fn next_page(&mut self) -> Result<Option<PageEnvelope>> {
        let Some(url) = self.next_url.take() else {
            return Ok(None);
        };

        let mut request = self
            .client
            .openapi_request(RequestMethod::Get, &url, &self.api_version);

        if let Some(mut params) = self.params.take() {
            if !params.contains("pageSize") {
                params.insert("pageSize", self.client.config().page_size.to_string());
            }
            request = request.query_params(params);
        }

        for (name, value) in &self.headers {
            request = request.header(name.clone(), value.clone());
        }

        let response = self.client.execute(request).await?;
        let next = response.link_href(REL_NEXT_PAGE);
        let page: PageEnvelope = response
            .json()
            .await
            .map_err(|e| e.context(format!("page {} of {}", self.pages_fetched + 1, url)))?;

        self.pages_fetched += 1;
        debug!(
            page = self.pages_fetched,
            values = page.values.len(),
            has_next = next.is_some(),
            "Fetched page"
        );

        self.next_url = next;
        Ok(Some(page))
    }

    /// Drain every page, keeping server order.
    pub async fn collect_values(mut self) -> Result<Vec<Value>> {
        let mut values = Vec::new();
        while let Some(page) = self.next_page().await? {
            values.extend(page.values);
        }
        Ok(values)
    }

    /// Pages as a lazy stream.
    pub fn into_stream(self) -> impl Stream<Item = Result<PageEnvelope>> + 'a {
        futures::stream::try_unfold(self, |mut pager| async move {
            Ok(pager.next_page().await?.map(|page| (page, pager)))
        })
    }
}

impl std::fmt::Debug for Pager<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pager")
            .field("next_url", &self.next_url)
            .field("api_version", &self.api_version)
            .field("pages_fetched", &self.pages_fetched)
            .finish()
    }
}
