//! Error types for productql-server
//!
//! [`ProductError`] is what resolvers report. Each variant maps to a GraphQL
//! error with a stable `code` extension; the message is all the caller sees.

use async_graphql::ErrorExtensions;
use thiserror::Error;

use crate::store::StoreError;

pub type ProductResult<T> = Result<T, ProductError>;

#[derive(Error, Debug)]
pub enum ProductError {
    /// The store could not be reached. The cause stays attached for logs.
    #[error("Could not connect to MongoDB")]
    Connection {
        #[source]
        source: StoreError,
    },

    /// Persisting a new product failed. The cause is logged, never returned.
    #[error("Failed to add product")]
    CreateFailed,

    /// Read-path storage failure, reported as-is.
    #[error("{0}")]
    Store(#[from] StoreError),
}

impl ProductError {
    /// Machine-readable code placed in the error's `extensions`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Connection { .. } => "CONNECTION_ERROR",
            Self::CreateFailed => "CREATE_FAILED",
            Self::Store(StoreError::InvalidId(_)) => "BAD_USER_INPUT",
            Self::Store(_) => "STORE_ERROR",
        }
    }
}

impl ErrorExtensions for ProductError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", self.code()))
    }
}

/// Server error type
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Lambda runtime error: {0}")]
    Lambda(#[source] lambda_runtime::Error),
}
