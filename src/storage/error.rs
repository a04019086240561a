use std::io;

/// An error related to storage operations (reads, writes, transactions).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StorageError {
    /// Error from the OS I/O layer or the underlying key-value store.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// Error related to data corruption.
    #[error(transparent)]
    Corruption(#[from] CorruptionError),
    /// A requested term, id or triple is not in the store.
    #[error("term or triple not found in the store")]
    NotFound,
    /// The term dictionary has run out of 32-bit ids.
    #[error("the term dictionary is full")]
    Full,
}

impl From<StorageError> for io::Error {
    #[inline]
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::Io(error) => error,
            StorageError::Corruption(error) => error.into(),
            StorageError::NotFound => Self::new(io::ErrorKind::NotFound, error.to_string()),
            _ => Self::other(error.to_string()),
        }
    }
}

/// An error raised if the database content is corrupted.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct CorruptionError(String);

impl CorruptionError {
    /// Builds an error from a printable error message.
    #[inline]
    pub(crate) fn msg(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl From<CorruptionError> for io::Error {
    #[inline]
    fn from(error: CorruptionError) -> Self {
        Self::new(io::ErrorKind::InvalidData, error.to_string())
    }
}

/// An error raised when a byte slice cannot be decoded into a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot decode bytes into a term")]
pub struct DecodeError;

impl From<DecodeError> for CorruptionError {
    #[inline]
    fn from(error: DecodeError) -> Self {
        Self::msg(error.to_string())
    }
}

impl From<DecodeError> for StorageError {
    #[inline]
    fn from(error: DecodeError) -> Self {
        Self::Corruption(error.into())
    }
}

impl From<redb::DatabaseError> for StorageError {
    fn from(error: redb::DatabaseError) -> Self {
        match error {
            redb::DatabaseError::Storage(error) => error.into(),
            _ => Self::Io(io::Error::other(error)),
        }
    }
}

impl From<redb::TransactionError> for StorageError {
    fn from(error: redb::TransactionError) -> Self {
        match error {
            redb::TransactionError::Storage(error) => error.into(),
            _ => Self::Io(io::Error::other(error)),
        }
    }
}

impl From<redb::TableError> for StorageError {
    fn from(error: redb::TableError) -> Self {
        match error {
            redb::TableError::Storage(error) => error.into(),
            redb::TableError::TableDoesNotExist(_) => {
                Self::Corruption(CorruptionError::msg(error.to_string()))
            }
            _ => Self::Io(io::Error::other(error)),
        }
    }
}

impl From<redb::StorageError> for StorageError {
    fn from(error: redb::StorageError) -> Self {
        match error {
            redb::StorageError::Io(error) => Self::Io(error),
            redb::StorageError::Corrupted(_) => {
                Self::Corruption(CorruptionError::msg(error.to_string()))
            }
            _ => Self::Io(io::Error::other(error)),
        }
    }
}

impl From<redb::CommitError> for StorageError {
    fn from(error: redb::CommitError) -> Self {
        match error {
            redb::CommitError::Storage(error) => error.into(),
            _ => Self::Io(io::Error::other(error)),
        }
    }
}
