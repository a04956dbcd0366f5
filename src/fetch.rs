//! Three-state outcome of a background fetch.

use crate::error::ApiError;

/// Settled result of one request.
///
/// `Failed` is rendered exactly like `Empty` unless the application opts
/// into showing fetch errors; the reason is always logged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fetch<T> {
    Ready(T),
    Empty,
    Failed(String),
}

/// Values that can be "present but empty" (an empty list, an empty file).
pub trait Emptiable {
    fn is_empty_value(&self) -> bool;
}

impl<T> Emptiable for Vec<T> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl Emptiable for String {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Emptiable> Fetch<T> {
    /// Settles a request result, logging failures under `what`.
    pub fn settle(result: Result<T, ApiError>, what: &str) -> Self {
        match result {
            Ok(value) if value.is_empty_value() => Self::Empty,
            Ok(value) => Self::Ready(value),
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch {what}");
                Self::Failed(err.to_string())
            }
        }
    }
}

impl<T: Default> Fetch<T> {
    /// The value, with `Empty` and `Failed` both collapsing to the default.
    pub fn into_value(self) -> T {
        match self {
            Self::Ready(value) => value,
            Self::Empty | Self::Failed(_) => T::default(),
        }
    }
}

impl<T> Fetch<T> {
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}
