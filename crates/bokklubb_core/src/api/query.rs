use urlencoding::encode;

/// Builder for the relation-population and equality-filter query parameters the remote content
/// API understands. Parameter values are percent-encoded; the bracketed parameter names are part
/// of the API's wire contract and sent as-is.
pub struct QueryBuilder {
    url: String,
    params: Vec<String>,
}

impl QueryBuilder {
    #[must_use]
    #[inline]
    pub const fn new(url: String) -> Self {
        Self {
            url,
            params: Vec::new(),
        }
    }

    /// Populate every first-level relation of the queried resource.
    #[must_use]
    #[inline]
    pub fn populate_all(mut self) -> Self {
        self.params.push("populate=*".to_owned());
        self
    }

    /// Populate a nested relation path, e.g. the cover image of each rating's book.
    #[must_use]
    #[inline]
    pub fn populate_nested(mut self, relation: &str, nested: &str) -> Self {
        self.params
            .push(format!("populate[{relation}][populate]={}", encode(nested)));
        self
    }

    /// Restrict the result set to records whose `relation` points at the given document ID.
    #[must_use]
    #[inline]
    pub fn filter_eq(mut self, relation: &str, document_id: &str) -> Self {
        self.params.push(format!(
            "filters[{relation}][documentId][$eq]={}",
            encode(document_id)
        ));
        self
    }

    #[must_use]
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub fn build(self) -> String {
        if self.params.is_empty() {
            self.url
        } else {
            format!("{}?{}", self.url, self.params.join("&"))
        }
    }
}
