//! Validation behavior - Runs every validator registered for a request

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::join_all;
use tracing::debug;
use validator::Validate;

use super::{Next, PipelineBehavior, Request};
use crate::application::error::AppResult;
use crate::domain::value_objects::{FieldError, ValidationError};

/// A set of rules checked before a request reaches its handler
///
/// Returns the violations found; an `Err` means the check itself could not run.
#[async_trait]
pub trait Validator: Send + Sync {
    type Request: Request;

    async fn validate(&self, request: &Self::Request) -> AppResult<Vec<FieldError>>;
}

/// Field-level rules declared with `#[derive(Validate)]` on the request
pub struct FieldRules<R>(PhantomData<fn() -> R>);

impl<R> FieldRules<R> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<R> Default for FieldRules<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R> Validator for FieldRules<R>
where
    R: Request + Validate,
{
    type Request = R;

    async fn validate(&self, request: &R) -> AppResult<Vec<FieldError>> {
        let Err(errors) = request.validate() else {
            return Ok(Vec::new());
        };

        let mut failures: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |err| {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    FieldError::new(field.to_string(), message, err.code.to_string())
                })
            })
            .collect();
        failures.sort_by(|a, b| a.field.cmp(&b.field));
        Ok(failures)
    }
}

/// Fails the request with every collected `FieldError`, or passes it on
pub struct ValidationBehavior<R: Request> {
    validators: Vec<Arc<dyn Validator<Request = R>>>,
}

impl<R: Request> ValidationBehavior<R> {
    pub fn new(validators: Vec<Arc<dyn Validator<Request = R>>>) -> Self {
        Self { validators }
    }
}

#[async_trait]
impl<R: Request> PipelineBehavior<R> for ValidationBehavior<R> {
    async fn handle(&self, request: &R, next: Next<'_, R::Response>) -> AppResult<R::Response> {
        if self.validators.is_empty() {
            return next.await;
        }

        let outcomes = join_all(self.validators.iter().map(|v| v.validate(request))).await;

        let mut failures = Vec::new();
        for outcome in outcomes {
            failures.extend(outcome?);
        }

        if !failures.is_empty() {
            debug!(
                request = R::NAME,
                failures = failures.len(),
                "Request rejected by validation"
            );
            return Err(ValidationError::new(failures).into());
        }

        next.await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::error::AppError;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Debug, Validate)]
    struct Rename {
        #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
        name: String,
        #[validate(length(max = 5))]
        tag: String,
    }

    crate::application::pipeline::request!(Rename => String);

    struct AlwaysFails;

    #[async_trait]
    impl Validator for AlwaysFails {
        type Request = Rename;

        async fn validate(&self, _request: &Rename) -> AppResult<Vec<FieldError>> {
            Ok(vec![FieldError::new("owner", "Owner is required", "required")])
        }
    }

    fn behavior(validators: Vec<Arc<dyn Validator<Request = Rename>>>) -> ValidationBehavior<Rename> {
        ValidationBehavior::new(validators)
    }

    #[tokio::test]
    async fn field_rules_report_every_field_sorted() {
        let request = Rename {
            name: "ab".into(),
            tag: "too-long".into(),
        };
        let failures = FieldRules::<Rename>::new().validate(&request).await.unwrap();

        let fields: Vec<_> = failures.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "tag"]);
        assert_eq!(failures[0].message, "Name must be at least 3 characters");
        assert_eq!(failures[1].message, "length");
    }

    #[tokio::test]
    async fn failures_from_all_validators_short_circuit_the_handler() {
        let reached = AtomicBool::new(false);
        let behavior = behavior(vec![Arc::new(FieldRules::new()), Arc::new(AlwaysFails)]);
        let request = Rename {
            name: "ab".into(),
            tag: "ok".into(),
        };

        let next: Next<'_, String> = Box::pin(async {
            reached.store(true, Ordering::SeqCst);
            Ok("handled".to_string())
        });
        let err = behavior.handle(&request, next).await.unwrap_err();

        assert!(!reached.load(Ordering::SeqCst));
        match err {
            AppError::Validation(validation) => {
                assert!(validation.has_field("name"));
                assert!(validation.has_field("owner"));
                assert_eq!(validation.errors().len(), 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn valid_or_unvalidated_requests_pass_through() {
        let request = Rename {
            name: "abc".into(),
            tag: "ok".into(),
        };

        let next: Next<'_, String> = Box::pin(async { Ok("handled".to_string()) });
        let response = behavior(vec![Arc::new(FieldRules::new())])
            .handle(&request, next)
            .await
            .unwrap();
        assert_eq!(response, "handled");

        let next: Next<'_, String> = Box::pin(async { Ok("bare".to_string()) });
        let response = behavior(Vec::new()).handle(&request, next).await.unwrap();
        assert_eq!(response, "bare");
    }
}
