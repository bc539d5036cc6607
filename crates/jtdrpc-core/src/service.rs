//! Service metadata builder
//!
//! Collects a service's methods and resolves their request and response
//! types through one shared [`Registry`], so a type used by several methods
//! becomes a single shared definition.

use crate::descriptor::{Describe, TypeDescriptor};
use crate::error::ResolveResult;
use crate::meta::{DEFAULT_METHOD_TIMEOUT_MS, Meta, MethodMeta};
use crate::registry::Registry;
use crate::resolver::resolve;
use crate::schema::Schema;
use std::time::Duration;

/// Per-method options
#[derive(Debug, Clone, Default)]
pub struct MethodOptions {
    pub help: String,
    /// Defaults to one minute
    pub timeout: Option<Duration>,
    /// Overrides the parameter names derived from the request fields
    pub param_names: Option<Vec<String>>,
}

impl MethodOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn param_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.param_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout
            .map(|t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(DEFAULT_METHOD_TIMEOUT_MS)
    }
}

/// Builds a [`Meta`] document method by method.
///
/// # Example
///
/// ```ignore
/// let mut builder = ServiceBuilder::new("users").help("User directory");
/// builder.method::<GetUserRequest, User>("getUser", MethodOptions::new())?;
/// let meta = builder.build();
/// ```
#[derive(Debug, Default)]
pub struct ServiceBuilder {
    meta: Meta,
    registry: Registry,
}

impl ServiceBuilder {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            meta: Meta::new(service_name),
            registry: Registry::new(),
        }
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.meta.help = help.into();
        self
    }

    pub fn multi_arg(mut self, multi_arg: bool) -> Self {
        self.meta.multi_arg = multi_arg;
        self
    }

    /// Add a method whose request and response types describe themselves
    pub fn method<Req, Res>(
        &mut self,
        name: impl Into<String>,
        options: MethodOptions,
    ) -> ResolveResult<&mut Self>
    where
        Req: Describe + ?Sized,
        Res: Describe + ?Sized,
    {
        self.method_with_descriptors(name, &Req::describe(), &Res::describe(), options)
    }

    /// Add a method from explicit descriptors
    pub fn method_with_descriptors(
        &mut self,
        name: impl Into<String>,
        request: &TypeDescriptor,
        response: &TypeDescriptor,
        options: MethodOptions,
    ) -> ResolveResult<&mut Self> {
        let name = name.into();

        // A response that fails to resolve must not leave the request's
        // definitions behind.
        let snapshot = self.registry.clone();
        let request_schema = resolve(request, &mut self.registry)?;
        let response_schema = match resolve(response, &mut self.registry) {
            Ok(schema) => schema,
            Err(e) => {
                self.registry = snapshot;
                return Err(e);
            }
        };

        let param_names = options
            .param_names
            .clone()
            .unwrap_or_else(|| request.field_names());

        tracing::debug!(
            "Added method {} to service {}",
            name,
            self.meta.service_name
        );

        self.push(MethodMeta {
            method_name: name,
            param_names,
            method_timeout: options.timeout_ms(),
            help: options.help,
            request_type_def: Some(request_schema),
            response_type_def: Some(response_schema),
        });
        Ok(self)
    }

    /// Add a method whose schemas were built by hand.
    ///
    /// Refs in the schemas must name definitions resolved by this builder.
    pub fn method_with_schemas(
        &mut self,
        name: impl Into<String>,
        request: Option<Schema>,
        response: Option<Schema>,
        options: MethodOptions,
    ) -> &mut Self {
        let mut method = MethodMeta::new(name);
        method.method_timeout = options.timeout_ms();
        method.param_names = options.param_names.unwrap_or_default();
        method.help = options.help;
        method.request_type_def = request;
        method.response_type_def = response;
        self.push(method);
        self
    }

    fn push(&mut self, method: MethodMeta) {
        // A later declaration replaces an earlier one of the same name.
        if let Some(existing) = self
            .meta
            .interfaces
            .iter_mut()
            .find(|m| m.method_name == method.method_name)
        {
            *existing = method;
        } else {
            self.meta.interfaces.push(method);
        }
    }

    /// Registry holding every definition resolved so far
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Finish the document, attaching every resolved definition
    pub fn build(self) -> Meta {
        let mut meta = self.meta;
        meta.definitions = self.registry.into_definitions();
        meta
    }
}

#[cfg(test)]
#[path = "service/service_tests.rs"]
mod service_tests;
