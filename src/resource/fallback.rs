//! Fallback Policy
//!
//! Per-operation substitution of a benign value for a 404-class failure.
//! Reads and deletes tolerate absence; writes and authorization failures
//! always propagate.

use crate::error::{Error, Result};

/// What an operation returns instead of failing when the resource is absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackRule {
    /// `list` yields an empty collection
    EmptyOnNotFound,
    /// `get` yields `None`
    NullOnNotFound,
    /// `delete` yields `false`
    FalseOnNotFound,
    /// `create`/`update` surface every error
    Propagate,
}

/// Canonical operations of a resource binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn fallback(&self) -> FallbackRule {
        match self {
            Operation::List => FallbackRule::EmptyOnNotFound,
            Operation::Get => FallbackRule::NullOnNotFound,
            Operation::Delete => FallbackRule::FalseOnNotFound,
            Operation::Create | Operation::Update => FallbackRule::Propagate,
        }
    }

    /// Apply this operation's rule to `result`: `Ok(None)` when the failure
    /// is recovered as absence, the error itself otherwise
    pub fn resolve<T>(self, result: Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) if self.fallback().recovers(&e) => {
                tracing::debug!("{:?}: treating as absent: {}", self, e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

impl FallbackRule {
    /// Whether this rule swallows `error`. Only absence is ever recovered;
    /// 401/403, validation and transport failures always propagate.
    pub fn recovers(&self, error: &Error) -> bool {
        match self {
            FallbackRule::Propagate => false,
            _ => error.is_not_found(),
        }
    }
}
