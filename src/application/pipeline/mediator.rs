//! Mediator - Resolves the handler for a request and runs the pipeline
//!
//! Handlers and validators are registered explicitly on a `HandlerRegistry`
//! at startup; the registry is immutable once built and shared behind an `Arc`.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::{
    run_pipeline, LoggingBehavior, PipelineBehavior, Request, RequestHandler, ValidationBehavior,
    Validator,
};
use crate::application::error::{AppError, AppResult};

/// Everything registered for one request type
struct Registration<R: Request> {
    handler: Option<Arc<dyn RequestHandler<Request = R>>>,
    validators: Vec<Arc<dyn Validator<Request = R>>>,
}

impl<R: Request> Default for Registration<R> {
    fn default() -> Self {
        Self {
            handler: None,
            validators: Vec::new(),
        }
    }
}

/// Request type to handler table
pub struct HandlerRegistry {
    registrations: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl HandlerRegistry {
    pub fn builder() -> HandlerRegistryBuilder {
        HandlerRegistryBuilder::default()
    }

    fn registration<R: Request>(&self) -> Option<&Registration<R>> {
        self.registrations
            .get(&TypeId::of::<R>())
            .and_then(|r| r.downcast_ref::<Registration<R>>())
    }
}

#[derive(Default)]
pub struct HandlerRegistryBuilder {
    registrations: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl HandlerRegistryBuilder {
    /// Register the handler for `H::Request`, replacing any earlier one
    pub fn handler<H>(mut self, handler: H) -> Self
    where
        H: RequestHandler + 'static,
    {
        let handler: Arc<dyn RequestHandler<Request = H::Request>> = Arc::new(handler);
        self.update::<H::Request>(|r| r.handler = Some(handler));
        self
    }

    /// Add a validator for `V::Request`; validators accumulate
    pub fn validator<V>(mut self, validator: V) -> Self
    where
        V: Validator + 'static,
    {
        let validator: Arc<dyn Validator<Request = V::Request>> = Arc::new(validator);
        self.update::<V::Request>(|r| r.validators.push(validator));
        self
    }

    pub fn build(self) -> HandlerRegistry {
        HandlerRegistry {
            registrations: self.registrations,
        }
    }

    fn update<R: Request>(&mut self, apply: impl FnOnce(&mut Registration<R>)) {
        let key = TypeId::of::<R>();
        let mut registration = self
            .registrations
            .remove(&key)
            .and_then(|r| r.downcast::<Registration<R>>().ok())
            .map(|r| *r)
            .unwrap_or_default();
        apply(&mut registration);
        self.registrations.insert(key, Box::new(registration));
    }
}

/// Dispatches requests through validation, logging and the handler
#[derive(Clone)]
pub struct Mediator {
    registry: Arc<HandlerRegistry>,
}

impl Mediator {
    pub fn new(registry: Arc<HandlerRegistry>) -> Self {
        Self { registry }
    }

    pub async fn send<R: Request>(
        &self,
        request: &R,
        cancel: &CancellationToken,
    ) -> AppResult<R::Response> {
        let registration = self
            .registry
            .registration::<R>()
            .ok_or(AppError::HandlerNotRegistered(R::NAME))?;
        let handler = registration
            .handler
            .as_deref()
            .ok_or(AppError::HandlerNotRegistered(R::NAME))?;

        let validation = ValidationBehavior::new(registration.validators.clone());
        let logging = LoggingBehavior;
        let behaviors: [&dyn PipelineBehavior<R>; 2] = [&validation, &logging];

        run_pipeline(&behaviors, request, handler, cancel).await
    }
}
