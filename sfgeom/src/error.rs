//! Error type used by the crate.

use std::collections::TryReserveError;

use thiserror::Error;

/// Result of a fallible geometry operation.
pub type Result<T> = std::result::Result<T, GeometryError>;

/// Error enum.
///
/// Every variant carries a message describing which structural rule was violated, so that malformed input can be
/// tracked down without a debugger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// The input buffer is shorter than the structure it declares.
    #[error("not enough data: {0}")]
    NotEnoughData(String),

    /// The input is malformed: invalid byte order marker, negative counts, WKT grammar violation etc.
    #[error("corrupt data: {0}")]
    CorruptData(String),

    /// The geometry type is unknown, or not accepted in the given context.
    #[error("unsupported geometry type: {0}")]
    UnsupportedGeometryType(String),

    /// Memory for a declared element count could not be allocated.
    #[error("out of memory: {0}")]
    OutOfMemory(String),

    /// Arguments of a constructor or mutator are inconsistent.
    #[error("invalid input geometry: {0}")]
    InvalidInput(String),

    /// Coordinate transformation rejected one of the coordinates.
    #[error("coordinate transformation failed: {0}")]
    TransformFailed(String),
}

/// Kind of a [`GeometryError`] without the message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`GeometryError::NotEnoughData`].
    NotEnoughData,
    /// See [`GeometryError::CorruptData`].
    CorruptData,
    /// See [`GeometryError::UnsupportedGeometryType`].
    UnsupportedGeometryType,
    /// See [`GeometryError::OutOfMemory`].
    OutOfMemory,
    /// See [`GeometryError::InvalidInput`].
    InvalidInput,
    /// See [`GeometryError::TransformFailed`].
    TransformFailed,
}

impl GeometryError {
    /// Kind of the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GeometryError::NotEnoughData(_) => ErrorKind::NotEnoughData,
            GeometryError::CorruptData(_) => ErrorKind::CorruptData,
            GeometryError::UnsupportedGeometryType(_) => ErrorKind::UnsupportedGeometryType,
            GeometryError::OutOfMemory(_) => ErrorKind::OutOfMemory,
            GeometryError::InvalidInput(_) => ErrorKind::InvalidInput,
            GeometryError::TransformFailed(_) => ErrorKind::TransformFailed,
        }
    }
}

impl From<TryReserveError> for GeometryError {
    fn from(value: TryReserveError) -> Self {
        Self::OutOfMemory(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(
            GeometryError::CorruptData("x".into()).kind(),
            ErrorKind::CorruptData
        );
        assert_eq!(
            GeometryError::NotEnoughData("x".into()).kind(),
            ErrorKind::NotEnoughData
        );
    }

    #[test]
    fn message_contains_reason() {
        let err = GeometryError::CorruptData("ring point count is negative".into());
        assert_eq!(err.to_string(), "corrupt data: ring point count is negative");
    }

    #[test]
    fn reserve_failure_is_out_of_memory() {
        let mut v: Vec<u64> = Vec::new();
        let err: GeometryError = v.try_reserve(usize::MAX).unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::OutOfMemory);
    }
}
