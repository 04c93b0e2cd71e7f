use fatvec_alloc::AllocError;
use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn capacity_overflow() -> Error {
        Error(ErrorKind::CapacityOverflow.into())
    }

    /// Returns `true` if the allocator could not satisfy a request.
    pub fn is_allocation_failure(&self) -> bool {
        matches!(self.kind(), ErrorKind::AllocationFailed { .. })
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("capacity overflow")]
    CapacityOverflow,

    #[error("allocation failed: {source}")]
    AllocationFailed {
        #[from]
        source: AllocError,
    },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

impl From<AllocError> for Error {
    fn from(e: AllocError) -> Self {
        ErrorKind::from(e).into()
    }
}
