//! Errors callers need to tell apart.
//!
//! Everything else travels as `anyhow::Error`. These ride inside it and are
//! recovered with `downcast_ref`.

/// Failures raised by [`BackendRouter`](crate::backends::BackendRouter).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouterError {
    /// The requested backend is not registered, or no default exists.
    #[error("unknown backend: {}", .name.as_deref().unwrap_or("<none>"))]
    UnknownBackend { name: Option<String> },
}
