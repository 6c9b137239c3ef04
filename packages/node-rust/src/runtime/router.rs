//! Operation routing: dispatches an [`Operation`] to its module service.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tower::Service;

use super::operation::{Operation, OperationError, OperationResponse};

/// A boxed Tower service handling operations for a single module.
type BoxedModuleService = Box<
    dyn Service<
            Operation,
            Response = OperationResponse,
            Error = OperationError,
            Future = BoxedFuture,
        > + Send,
>;

type BoxedFuture = Pin<Box<dyn Future<Output = Result<OperationResponse, OperationError>> + Send>>;

/// Routes operations to module services by the module name each operation
/// variant derives.
///
/// Operations addressed to an unregistered module fail with
/// [`OperationError::UnknownModule`].
pub struct ModuleRouter {
    services: HashMap<&'static str, BoxedModuleService>,
}

impl ModuleRouter {
    /// Create a new empty router.
    #[must_use]
    pub fn new() -> Self {
        Self {
            services: HashMap::new(),
        }
    }

    /// Register the service handling operations for `name`.
    pub fn register<S>(&mut self, name: &'static str, service: S)
    where
        S: Service<Operation, Response = OperationResponse, Error = OperationError>
            + Send
            + 'static,
        S::Future: Send + 'static,
    {
        self.services.insert(name, Box::new(ServiceWrapper(service)));
    }
}

impl Default for ModuleRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Operation> for ModuleRouter {
    type Response = OperationResponse;
    type Error = OperationError;
    type Future = BoxedFuture;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        // The router is ready when every registered module service is.
        for svc in self.services.values_mut() {
            match svc.poll_ready(cx) {
                Poll::Ready(Ok(())) => {}
                Poll::Ready(Err(e)) => return Poll::Ready(Err(e)),
                Poll::Pending => return Poll::Pending,
            }
        }
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, op: Operation) -> Self::Future {
        let module = op.kind.module();
        match self.services.get_mut(module) {
            Some(svc) => svc.call(op),
            None => Box::pin(async move {
                Err(OperationError::UnknownModule {
                    name: module.to_string(),
                })
            }),
        }
    }
}

/// Wrapper type-erasing a concrete module service into a `BoxedModuleService`.
struct ServiceWrapper<S>(S);

impl<S> Service<Operation> for ServiceWrapper<S>
where
    S: Service<Operation, Response = OperationResponse, Error = OperationError> + Send,
    S::Future: Send + 'static,
{
    type Response = OperationResponse;
    type Error = OperationError;
    type Future = BoxedFuture;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.0.poll_ready(cx)
    }

    fn call(&mut self, op: Operation) -> Self::Future {
        Box::pin(self.0.call(op))
    }
}
