//! Query expression evaluation for in-memory document filtering.

use std::cmp::Ordering;
use bson::Bson;

use docmanager_core::{
    query::{QueryVisitor, Expr, FieldOp},
    error::{DocumentStoreError, DocumentStoreResult},
};


/// Evaluates filter expressions against a single BSON document.
pub(crate) struct DocumentEvaluator<'a> {
    document: &'a Bson,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Bson) -> Self {
        Self { document }
    }

    pub fn evaluate(&mut self, expr: &Expr) -> DocumentStoreResult<bool> {
        self.visit_expr(expr)
    }

    /// Keeps the documents matching `expr`, preserving their order.
    pub fn filter_documents(
        documents: impl IntoIterator<Item = &'a Bson>,
        expr: &Expr,
    ) -> DocumentStoreResult<Vec<Bson>> {
        let mut matched = Vec::new();

        for doc in documents {
            if DocumentEvaluator::new(doc).evaluate(expr)? {
                matched.push(doc.clone());
            }
        }

        Ok(matched)
    }

    /// Resolves a dotted field path (`author.id`) through embedded documents.
    fn resolve(&self, path: &str) -> Option<&'a Bson> {
        let mut current = self.document;

        for segment in path.split('.') {
            current = current.as_document()?.get(segment)?;
        }

        Some(current)
    }
}

/// Orders two values of the same kind; mixed kinds never compare.
fn compare(left: &Bson, right: &Bson) -> Option<Ordering> {
    match (left, right) {
        (Bson::DateTime(a), Bson::DateTime(b)) => a.partial_cmp(b),
        (Bson::String(a), Bson::String(b)) => a.partial_cmp(b),
        _ => None,
    }
}

impl<'a> QueryVisitor for DocumentEvaluator<'a> {
    type Output = bool;
    type Error = DocumentStoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if !self.visit_expr(expr)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if self.visit_expr(expr)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn visit_field(&mut self, field: &str, op: &FieldOp, value: &Bson) -> Result<Self::Output, Self::Error> {
        let Some(field_value) = self.resolve(field) else {
            return Ok(false);
        };

        Ok(match op {
            FieldOp::Gt => compare(field_value, value) == Some(Ordering::Greater),
            FieldOp::Lt => compare(field_value, value) == Some(Ordering::Less),
            FieldOp::Contains => match (field_value, value) {
                (Bson::String(haystack), Bson::String(needle)) => haystack.contains(needle.as_str()),
                _ => false,
            },
            FieldOp::StartsWith => match (field_value, value) {
                (Bson::String(text), Bson::String(prefix)) => text.starts_with(prefix.as_str()),
                _ => false,
            },
            FieldOp::AnyOf => match value {
                Bson::Array(values) => values.iter().any(|val| val == field_value),
                _ => false,
            },
        })
    }
}
