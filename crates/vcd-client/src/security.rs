//! Security utilities for vCD API operations.
//!
//! User-provided values end up in three places: FIQL filters, URL path
//! segments and XML documents. Each has a module here.
//!
//! ## FIQL filters
//!
//! FIQL reserves `;`, `,`, `(`, `)` and `=`. Values must be escaped before
//! being placed in a filter:
//!
//! ```rust
//! use busbar_vcd_client::security::fiql;
//!
//! let filter = format!("name=={}", fiql::escape_value("a;b"));
//! assert_eq!(filter, "name==a%3Bb");
//! ```
//!
//! ## URL path segments
//!
//! ```rust
//! use busbar_vcd_client::security::url;
//!
//! assert!(url::is_valid_urn("urn:vcloud:role:d3a3ba1a-3a14-4e3c-a8a4-2ea0d5e1a09f"));
//! assert_eq!(url::encode_param("a/../b"), "a%2F..%2Fb");
//! ```

/// FIQL escaping for OpenAPI `filter` parameters.
pub mod fiql {
    /// Percent-encode a value so it cannot close the comparison.
    ///
    /// The filter is encoded a second time when it becomes a query
    /// parameter; vCD decodes both layers.
    #[must_use]
    pub fn escape_value(value: &str) -> String {
        urlencoding::encode(value).into_owned()
    }

    /// Escape a value for a prefix match; `*` is the FIQL wildcard.
    ///
    /// ```rust
    /// use busbar_vcd_client::security::fiql;
    ///
    /// assert_eq!(fiql::like_prefix("Org *"), "Org%20%2A*");
    /// ```
    #[must_use]
    pub fn like_prefix(value: &str) -> String {
        let mut escaped = escape_value(value).replace('*', "%2A");
        escaped.push('*');
        escaped
    }

    /// Validate a filter field name such as `name` or `owner.id`.
    #[must_use]
    pub fn is_safe_field_name(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() => {}
            _ => return false,
        }
        if name.ends_with('.') || name.contains("..") {
            return false;
        }
        chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
    }
}

/// URL encoding utilities for parameter safety.
pub mod url {
    /// URL-encode a parameter value.
    #[must_use]
    pub fn encode_param(value: &str) -> String {
        urlencoding::encode(value).into_owned()
    }

    /// Validate a vCD entity id such as `urn:vcloud:role:<uuid>`.
    #[must_use]
    pub fn is_valid_urn(id: &str) -> bool {
        let mut parts = id.splitn(4, ':');
        let (Some("urn"), Some("vcloud"), Some(kind), Some(uuid)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return false;
        };

        !kind.is_empty()
            && kind.chars().all(|c| c.is_ascii_alphanumeric())
            && !uuid.is_empty()
            && uuid.chars().all(|c| c.is_ascii_hexdigit() || c == '-')
    }

    /// `<endpoint><id>` with the id validated.
    ///
    /// ```rust
    /// use busbar_vcd_client::security::url;
    ///
    /// let id = "urn:vcloud:role:d3a3ba1a-3a14-4e3c-a8a4-2ea0d5e1a09f";
    /// assert_eq!(
    ///     url::entity_path("1.0.0/roles/", id),
    ///     Some(format!("1.0.0/roles/{}", id))
    /// );
    /// assert_eq!(url::entity_path("1.0.0/roles/", "../secret"), None);
    /// ```
    #[must_use]
    pub fn entity_path(endpoint: &str, id: &str) -> Option<String> {
        if !is_valid_urn(id) {
            return None;
        }
        Some(format!("{}{}", endpoint, id))
    }
}

/// XML escaping for hand-built documents (SAML requests).
pub mod xml {
    /// Escape a string for safe inclusion in XML content.
    ///
    /// ```rust
    /// use busbar_vcd_client::security::xml;
    ///
    /// let safe = xml::escape("Hello <World> & 'Friends'");
    /// assert_eq!(safe, "Hello &lt;World&gt; &amp; &apos;Friends&apos;");
    /// ```
    #[must_use]
    pub fn escape(value: &str) -> String {
        let mut escaped = String::with_capacity(value.len() + 16);
        for ch in value.chars() {
            match ch {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&apos;"),
                _ => escaped.push(ch),
            }
        }
        escaped
    }
}
