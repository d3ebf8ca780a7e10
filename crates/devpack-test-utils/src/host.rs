use devpack_core::{DevpackError, Middleware, MiddlewareHost, SharedLocals};
use parking_lot::Mutex;

/// Host that records attachments and exposed locals.
#[derive(Debug, Default)]
pub struct RecordingHost {
    attached: Mutex<Vec<Middleware>>,
    locals: Mutex<Option<SharedLocals>>,
    reject: Option<String>,
    reject_only: Option<&'static str>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host that refuses every attachment.
    pub fn rejecting(message: impl Into<String>) -> Self {
        Self {
            reject: Some(message.into()),
            ..Self::default()
        }
    }

    /// Host that refuses only the middleware named `name`.
    pub fn rejecting_only(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            reject: Some(message.into()),
            reject_only: Some(name),
            ..Self::default()
        }
    }

    /// Names of attached middleware, in attachment order.
    pub fn attached_names(&self) -> Vec<&'static str> {
        self.attached.lock().iter().map(Middleware::name).collect()
    }

    pub fn attached(&self) -> Vec<Middleware> {
        self.attached.lock().clone()
    }

    pub fn exposed_locals(&self) -> Option<SharedLocals> {
        self.locals.lock().clone()
    }
}

impl MiddlewareHost for RecordingHost {
    fn attach(&self, middleware: Middleware) -> Result<(), DevpackError> {
        if let Some(message) = &self.reject
            && self.reject_only.is_none_or(|name| name == middleware.name())
        {
            return Err(DevpackError::Middleware(message.clone()));
        }
        self.attached.lock().push(middleware);
        Ok(())
    }

    fn expose_locals(&self, locals: SharedLocals) {
        *self.locals.lock() = Some(locals);
    }
}
