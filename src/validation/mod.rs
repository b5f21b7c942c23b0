//! Declarative per-route validation chains.
//!
//! Each route declares an ordered list of fields, each field an ordered list
//! of validator units. The runner awaits units in declared order; a field
//! stops at its first failure, so a store-backed predicate never runs on a
//! value an earlier format check already rejected. Failures across fields
//! are aggregated into one `ValidationFailed` report. A unit may instead
//! abort the whole run with a specific domain error (ownership and
//! uniqueness checks keep their own status codes this way).

pub mod rules;

use futures::future::BoxFuture;

use crate::error::{ApiError, FieldIssue};

/// Failure raised by a single validator unit.
#[derive(Debug)]
pub enum RuleError {
    /// A per-field message, collected into the ValidationFailed report.
    Field(String),
    /// A domain failure that aborts the run with its own error kind.
    Abort(ApiError),
}

pub type RuleResult = Result<(), RuleError>;

/// One validator unit in a field's chain.
pub enum Rule {
    /// Pre-evaluated format/presence check.
    Check(RuleResult),
    /// Store-backed predicate; awaited only if every earlier unit on the
    /// field passed.
    Lookup(BoxFuture<'static, RuleResult>),
}

impl Rule {
    pub fn check(result: RuleResult) -> Self {
        Rule::Check(result)
    }

    pub fn lookup<F>(future: F) -> Self
    where
        F: std::future::Future<Output = RuleResult> + Send + 'static,
    {
        Rule::Lookup(Box::pin(future))
    }

    /// Wraps a resolver whose failure should abort the run with its own
    /// error kind instead of joining the field report.
    pub fn guard<T, F>(future: F) -> Self
    where
        T: Send + 'static,
        F: std::future::Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        Rule::Lookup(Box::pin(async move {
            future.await.map(|_| ()).map_err(RuleError::Abort)
        }))
    }
}

/// Ordered rule sets for one route.
#[derive(Default)]
pub struct Chain {
    fields: Vec<(&'static str, Vec<Rule>)>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &'static str, rules: Vec<Rule>) -> Self {
        self.fields.push((name, rules));
        self
    }

    /// Runs every field's rules in declared order.
    pub async fn run(self) -> Result<(), ApiError> {
        let mut issues: Vec<FieldIssue> = Vec::new();

        for (field, rules) in self.fields {
            for rule in rules {
                let result = match rule {
                    Rule::Check(result) => result,
                    Rule::Lookup(future) => future.await,
                };
                match result {
                    Ok(()) => {}
                    Err(RuleError::Field(message)) => {
                        issues.push(FieldIssue {
                            field: field.to_string(),
                            message,
                        });
                        break;
                    }
                    Err(RuleError::Abort(error)) => return Err(error),
                }
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_failed(issues))
        }
    }
}
