/// Errors returned by grid construction, criteria validation and iteration.
///
/// All variants describe contract violations by the caller. Nothing inside
/// the walker performs I/O, so none of them are transient and none are
/// retried internally.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a grid cannot be built from the supplied parameters.
    #[error("invalid grid parameter '{name}': {reason}")]
    InvalidGrid {
        /// The name of the offending parameter (empty when the grid itself is at fault).
        name: String,
        /// The reason the grid was rejected.
        reason: String,
    },

    /// Returned when search criteria are malformed.
    #[error("invalid search criteria: {0}")]
    InvalidCriteria(String),

    /// Returned when an iterator operation is called out of order.
    #[error("illegal iterator state: {0}")]
    IllegalState(&'static str),

    /// Returned by a [`ParameterMaterializer`](crate::ParameterMaterializer)
    /// that cannot bind a permutation value onto its template.
    #[error("cannot materialize parameter '{name}': {reason}")]
    Materialization {
        /// The name of the parameter that failed to bind.
        name: String,
        /// The reason binding failed.
        reason: String,
    },
}

impl Error {
    pub(crate) fn invalid_grid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidGrid {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
