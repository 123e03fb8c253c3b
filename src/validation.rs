//! Pre-flight checks for write requests.
//!
//! Every create/update operation validates its request before building a URL
//! or touching the network, so a malformed request never reaches the service.

use crate::error::{Error, Result};

/// A request that carries required fields which can be checked locally.
pub trait Validate {
    /// Names of the missing required fields, in the order they are checked.
    fn violations(&self) -> Vec<&'static str>;

    /// Fails with [`Error::InvalidArgument`] naming the first missing field.
    fn validate(&self) -> Result<()> {
        match self.violations().first().copied() {
            Some(parameter) => Err(Error::invalid_argument(parameter)),
            None => Ok(()),
        }
    }
}

/// Names of the `(name, present)` pairs that are not present.
pub(crate) fn missing<const N: usize>(fields: [(&'static str, bool); N]) -> Vec<&'static str> {
    fields
        .into_iter()
        .filter_map(|(name, present)| (!present).then_some(name))
        .collect()
}
