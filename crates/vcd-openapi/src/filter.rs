//! FIQL filter builder with automatic value escaping.
//!
//! OpenAPI collections accept a `filter` query parameter written in FIQL.
//! Values are escaped with [`fiql::escape_value`] so user input can never
//! close a comparison or inject another one.
//!
//! # Example
//!
//! ```rust
//! use busbar_vcd_openapi::FilterBuilder;
//!
//! let filter = FilterBuilder::all()
//!     .eq("name", "Org Admin")?
//!     .ne("readOnly", "true")?
//!     .build();
//! assert_eq!(filter.as_deref(), Some("name==Org%20Admin;readOnly!=true"));
//! # Ok::<(), busbar_vcd_openapi::Error>(())
//! ```

use busbar_vcd_client::security::fiql;
use busbar_vcd_client::QueryParams;

use crate::error::{Error, ErrorKind, Result};

/// How conditions are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `;`
    And,
    /// `,`
    Or,
}

impl Combinator {
    fn separator(&self) -> &'static str {
        match self {
            Combinator::And => ";",
            Combinator::Or => ",",
        }
    }
}

/// Builder for FIQL filter expressions.
#[derive(Debug, Clone)]
pub struct FilterBuilder {
    combinator: Combinator,
    conditions: Vec<String>,
}

impl FilterBuilder {
    /// Conditions joined with AND.
    pub fn all() -> Self {
        Self {
            combinator: Combinator::And,
            conditions: Vec::new(),
        }
    }

    /// Conditions joined with OR.
    pub fn any() -> Self {
        Self {
            combinator: Combinator::Or,
            conditions: Vec::new(),
        }
    }

    /// `field==value`
    pub fn eq(self, field: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        self.compare(field.as_ref(), "==", &fiql::escape_value(value.as_ref()))
    }

    /// `field!=value`
    pub fn ne(self, field: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        self.compare(field.as_ref(), "!=", &fiql::escape_value(value.as_ref()))
    }

    /// `field=lt=value`
    pub fn lt(self, field: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        self.compare(field.as_ref(), "=lt=", &fiql::escape_value(value.as_ref()))
    }

    /// `field=le=value`
    pub fn le(self, field: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        self.compare(field.as_ref(), "=le=", &fiql::escape_value(value.as_ref()))
    }

    /// `field=gt=value`
    pub fn gt(self, field: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        self.compare(field.as_ref(), "=gt=", &fiql::escape_value(value.as_ref()))
    }

    /// `field=ge=value`
    pub fn ge(self, field: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        self.compare(field.as_ref(), "=ge=", &fiql::escape_value(value.as_ref()))
    }

    /// `field==prefix*`, matching values starting with `prefix`.
    pub fn like(self, field: impl AsRef<str>, prefix: impl AsRef<str>) -> Result<Self> {
        self.compare(field.as_ref(), "==", &fiql::like_prefix(prefix.as_ref()))
    }

    /// Nest another builder as a parenthesized group.
    pub fn group(mut self, group: FilterBuilder) -> Self {
        if let Some(expr) = group.build() {
            if group.conditions.len() > 1 {
                self.conditions.push(format!("({})", expr));
            } else {
                self.conditions.push(expr);
            }
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// The filter expression, or `None` when no condition was added.
    pub fn build(&self) -> Option<String> {
        if self.conditions.is_empty() {
            None
        } else {
            Some(self.conditions.join(self.combinator.separator()))
        }
    }

    /// Query parameters carrying the filter.
    pub fn into_params(self) -> QueryParams {
        match self.build() {
            Some(expr) => QueryParams::new().filter(expr),
            None => QueryParams::new(),
        }
    }

    fn compare(mut self, field: &str, operator: &str, value: &str) -> Result<Self> {
        if !fiql::is_safe_field_name(field) {
            return Err(Error::new(ErrorKind::InvalidFilter(format!(
                "invalid field name: {}",
                field
            ))));
        }
        self.conditions.push(format!("{}{}{}", field, operator, value));
        Ok(self)
    }
}

impl Default for FilterBuilder {
    fn default() -> Self {
        Self::all()
    }
}
