//! Tagged outcome of acquiring an external dependency.
//!
//! An unreachable MongoDB is not a test failure. Acquisition returns
//! [`Availability::Unavailable`] and the calling test branches on it, usually
//! through [`require_available!`](crate::require_available).

use crate::errors::DoclingtaxaError;
use serde::Serialize;
use std::fmt;

/// Why a dependency could not be provided
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnavailableReason {
    /// Human name of the dependency, e.g. `MongoDB`
    pub dependency: String,
    /// Endpoint that was tried, credentials removed
    pub endpoint: String,
    /// Underlying cause
    pub cause: String,
}

impl UnavailableReason {
    pub fn new<D, E, C>(dependency: D, endpoint: E, cause: C) -> Self
    where
        D: Into<String>,
        E: Into<String>,
        C: Into<String>,
    {
        Self { dependency: dependency.into(), endpoint: endpoint.into(), cause: cause.into() }
    }

    /// Reason for an unreachable MongoDB endpoint
    pub fn mongodb<E: Into<String>, C: Into<String>>(endpoint: E, cause: C) -> Self {
        Self::new("MongoDB", endpoint, cause)
    }
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} not available: {}", self.dependency, self.cause)
    }
}

impl From<UnavailableReason> for DoclingtaxaError {
    fn from(reason: UnavailableReason) -> Self {
        DoclingtaxaError::unavailable(reason.endpoint, reason.cause)
    }
}

/// Either a ready resource or the reason it is absent.
#[derive(Debug)]
#[must_use = "an unavailable dependency must be turned into a skip"]
pub enum Availability<T> {
    Ready(T),
    Unavailable(UnavailableReason),
}

impl<T> Availability<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// The resource, discarding any reason
    pub fn ready(self) -> Option<T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Unavailable(_) => None,
        }
    }

    pub fn reason(&self) -> Option<&UnavailableReason> {
        match self {
            Self::Ready(_) => None,
            Self::Unavailable(reason) => Some(reason),
        }
    }

    pub fn as_ref(&self) -> Availability<&T> {
        match self {
            Self::Ready(value) => Availability::Ready(value),
            Self::Unavailable(reason) => Availability::Unavailable(reason.clone()),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Availability<U> {
        match self {
            Self::Ready(value) => Availability::Ready(f(value)),
            Self::Unavailable(reason) => Availability::Unavailable(reason),
        }
    }

    /// Collapse into a `Result`, for callers that treat absence as an error
    pub fn into_result(self) -> crate::errors::Result<T> {
        match self {
            Self::Ready(value) => Ok(value),
            Self::Unavailable(reason) => Err(reason.into()),
        }
    }

    /// Message printed when a test is skipped
    pub fn skip_message(&self) -> Option<String> {
        self.reason().map(|reason| format!("skipping: {}", reason))
    }
}

/// Unwrap a [`Availability::Ready`] value or skip the current test.
///
/// The one-argument form returns `()`; pass a second argument for tests that
/// return a value (for example `Ok(())`).
#[macro_export]
macro_rules! require_available {
    ($availability:expr) => {
        $crate::require_available!($availability, ())
    };
    ($availability:expr, $ret:expr) => {
        match $availability {
            $crate::fixtures::Availability::Ready(value) => value,
            $crate::fixtures::Availability::Unavailable(reason) => {
                eprintln!("skipping {}: {}", module_path!(), reason);
                return $ret;
            }
        }
    };
}
