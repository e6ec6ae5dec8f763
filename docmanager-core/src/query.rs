//! Search requests and the filter expressions they lower to.
//!
//! A [`SearchRequest`] is the caller-facing description of a search: up to five
//! optional dimensions, combined with AND across dimensions and OR within one.
//! Backends never see it directly. [`SearchRequest::to_query`] lowers it into a
//! [`Query`] holding an [`Expr`] tree which a backend evaluates through a
//! [`QueryVisitor`].
//!
//! ```ignore
//! use docmanager::query::SearchRequest;
//!
//! let request = SearchRequest::builder()
//!     .title_prefixes(["Intro"])
//!     .author_ids(["u1", "u2"])
//!     .build();
//! ```

use bson::{Bson, DateTime};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::DocumentStoreError;

/// Field comparison operators for filter expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOp {
    /// Greater than.
    Gt,
    /// Less than.
    Lt,
    /// String contains value.
    Contains,
    /// String starts with value.
    StartsWith,
    /// Field equals any of the values in an array.
    AnyOf,
}

/// A filter expression over stored documents.
///
/// Field names may be dotted paths into embedded documents, e.g. `author.id`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Logical AND of multiple expressions (all must match).
    And(Vec<Expr>),
    /// Logical OR of multiple expressions (any must match).
    Or(Vec<Expr>),
    /// Field comparison expression.
    Field {
        /// The field path to compare.
        field: String,
        /// The comparison operator.
        op: FieldOp,
        /// The value to compare against.
        value: Bson,
    },
}

impl Expr {
    /// Creates a field comparison expression.
    pub fn field(field: String, op: FieldOp, value: Bson) -> Self {
        Expr::Field { field, op, value }
    }
}

/// Static constructors for filter expressions.
pub struct Filter;

impl Filter {
    pub fn gt(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Gt, value.into())
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Lt, value.into())
    }

    pub fn starts_with(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::StartsWith, value.into())
    }

    pub fn contains(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Contains, value.into())
    }

    /// Matches documents where the field equals any of `values`.
    pub fn any_of<V: Into<Bson>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Expr {
        Expr::field(
            field.into(),
            FieldOp::AnyOf,
            Bson::Array(values.into_iter().map(Into::into).collect()),
        )
    }

    pub fn and(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::And(exprs.into_iter().collect())
    }

    pub fn or(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::Or(exprs.into_iter().collect())
    }
}

/// A backend-neutral query. A query without a filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Optional filter expression to match documents.
    pub filter: Option<Expr>,
}

impl Query {
    /// Creates a query matching every document.
    pub fn all() -> Self {
        Query { filter: None }
    }

    /// Creates a query matching documents that satisfy `filter`.
    pub fn filtered(filter: Expr) -> Self {
        Query { filter: Some(filter) }
    }
}

/// Evaluates an [`Expr`] tree. Backends implement this for their storage form.
pub trait QueryVisitor {
    type Output;
    type Error: Into<DocumentStoreError>;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_field(
        &mut self,
        field: &str,
        op: &FieldOp,
        value: &Bson,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_expr(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        match expr {
            Expr::And(exprs) => self.visit_and(exprs),
            Expr::Or(exprs) => self.visit_or(exprs),
            Expr::Field { field, op, value } => self.visit_field(field, op, value),
        }
    }
}

/// An instant usable as a search bound.
///
/// Implemented for `bson::DateTime` and `chrono::DateTime<Utc>`. Bounds keep the
/// full precision of the value they were built from.
pub trait IntoBound {
    fn into_bound(self) -> chrono::DateTime<Utc>;
}

impl IntoBound for chrono::DateTime<Utc> {
    fn into_bound(self) -> chrono::DateTime<Utc> {
        self
    }
}

impl IntoBound for DateTime {
    fn into_bound(self) -> chrono::DateTime<Utc> {
        self.to_chrono()
    }
}

/// A multi-dimensional search over stored documents.
///
/// Every dimension is optional; `None` and an empty list both mean "no
/// constraint". A document matches when it satisfies every constrained
/// dimension, and it satisfies a list dimension when it matches any entry.
/// Both date bounds are exclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Title must start with one of these (case-sensitive).
    pub title_prefixes: Option<Vec<String>>,
    /// Content must contain one of these (case-sensitive).
    pub contains_contents: Option<Vec<String>>,
    /// Author id must equal one of these.
    pub author_ids: Option<Vec<String>>,
    /// Document must be created strictly after this instant.
    pub created_from: Option<chrono::DateTime<Utc>>,
    /// Document must be created strictly before this instant.
    pub created_to: Option<chrono::DateTime<Utc>>,
}

impl SearchRequest {
    /// Creates a request builder with no constraints set.
    pub fn builder() -> SearchRequestBuilder {
        SearchRequestBuilder::new()
    }

    /// Lowers this request into a [`Query`] over the stored document shape.
    ///
    /// Stored `created` values have millisecond precision, so the bounds are
    /// lowered to the whole millisecond that keeps the comparison exact:
    /// `created > from` iff `created > floor(from)`, and
    /// `created < to` iff `created < ceil(to)`.
    pub fn to_query(&self) -> Query {
        let mut clauses = Vec::new();

        if let Some(prefixes) = non_empty(&self.title_prefixes) {
            clauses.push(Filter::or(
                prefixes
                    .iter()
                    .map(|prefix| Filter::starts_with("title", prefix.as_str())),
            ));
        }

        if let Some(needles) = non_empty(&self.contains_contents) {
            clauses.push(Filter::or(
                needles
                    .iter()
                    .map(|needle| Filter::contains("content", needle.as_str())),
            ));
        }

        if let Some(ids) = non_empty(&self.author_ids) {
            clauses.push(Filter::any_of("author.id", ids.iter().map(String::as_str)));
        }

        if let Some(from) = &self.created_from {
            clauses.push(Filter::gt("created", floor_millis(from)));
        }

        if let Some(to) = &self.created_to {
            clauses.push(Filter::lt("created", ceil_millis(to)));
        }

        match clauses.len() {
            0 => Query::all(),
            1 => Query::filtered(clauses.remove(0)),
            _ => Query::filtered(Filter::and(clauses)),
        }
    }
}

fn non_empty(values: &Option<Vec<String>>) -> Option<&[String]> {
    values.as_deref().filter(|values| !values.is_empty())
}

fn floor_millis(at: &chrono::DateTime<Utc>) -> DateTime {
    DateTime::from_millis(at.timestamp_millis())
}

fn ceil_millis(at: &chrono::DateTime<Utc>) -> DateTime {
    let millis = at.timestamp_millis();

    if at.timestamp_subsec_nanos() % 1_000_000 == 0 {
        DateTime::from_millis(millis)
    } else {
        DateTime::from_millis(millis + 1)
    }
}

/// Field-by-field builder for [`SearchRequest`].
#[derive(Debug, Clone, Default)]
pub struct SearchRequestBuilder {
    request: SearchRequest,
}

impl SearchRequestBuilder {
    pub fn new() -> Self {
        SearchRequestBuilder { request: SearchRequest::default() }
    }

    pub fn title_prefixes<S: Into<String>>(mut self, prefixes: impl IntoIterator<Item = S>) -> Self {
        self.request.title_prefixes = Some(prefixes.into_iter().map(Into::into).collect());
        self
    }

    pub fn contains_contents<S: Into<String>>(mut self, needles: impl IntoIterator<Item = S>) -> Self {
        self.request.contains_contents = Some(needles.into_iter().map(Into::into).collect());
        self
    }

    pub fn author_ids<S: Into<String>>(mut self, ids: impl IntoIterator<Item = S>) -> Self {
        self.request.author_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the exclusive lower bound on `created`.
    pub fn created_from(mut self, from: impl IntoBound) -> Self {
        self.request.created_from = Some(from.into_bound());
        self
    }

    /// Sets the exclusive upper bound on `created`.
    pub fn created_to(mut self, to: impl IntoBound) -> Self {
        self.request.created_to = Some(to.into_bound());
        self
    }

    pub fn build(self) -> SearchRequest {
        self.request
    }
}
