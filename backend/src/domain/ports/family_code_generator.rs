//! Port for issuing family codes.

use crate::domain::FamilyCode;

/// Source of fresh family codes.
///
/// Codes are not checked for uniqueness; two registrations may receive the
/// same value and thereby share a family.
#[cfg_attr(test, mockall::automock)]
pub trait FamilyCodeGenerator: Send + Sync {
    /// Produce a code in `100000..=999999`.
    fn generate(&self) -> FamilyCode;
}
