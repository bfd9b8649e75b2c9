//! Accumulating definition checks.
//!
//! Each check yields a `Validation` so that a single build reports every
//! problem at once instead of failing on the first one.

use super::error::DefinitionError;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Outcome of one definition check.
pub(crate) type Check = Validation<(), NonEmptyVec<DefinitionError>>;

pub(crate) fn check(ok: bool, error: impl FnOnce() -> DefinitionError) -> Check {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(error())
    }
}

pub(crate) fn from_result(result: Result<(), DefinitionError>) -> Check {
    match result {
        Ok(()) => Validation::success(()),
        Err(error) => Validation::fail(error),
    }
}

/// Combine checks, collecting ALL failures.
pub(crate) fn accumulate(checks: Vec<Check>) -> Result<(), Vec<DefinitionError>> {
    match Validation::all_vec(checks).map(|_| ()) {
        Validation::Success(_) => Ok(()),
        Validation::Failure(errors) => Err(errors.iter().cloned().collect()),
    }
}
