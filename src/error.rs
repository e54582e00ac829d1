use thiserror::Error;

/// Errors produced by the checked accessors of [`InlinePoly`](crate::InlinePoly)
/// and [`BoxedPoly`](crate::BoxedPoly).
///
/// The `downcast_if` family never produces these; it reports absence with
/// `None` instead. A failed checked operation leaves the container untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolyError {
    /// The container holds no value.
    #[error("container is empty")]
    Empty,
    /// The held value's concrete type is not the requested one.
    #[error("stored value is a `{actual}`, not a `{expected}`")]
    TypeMismatch {
        /// Name of the type the caller asked for.
        expected: &'static str,
        /// Name of the type actually held.
        actual: &'static str,
    },
}
