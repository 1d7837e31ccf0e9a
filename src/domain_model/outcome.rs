use crate::domain_model::AccessToken;

/// Settlement of one refresh round, fanned out to every caller in the
/// expiry cohort. All members of a cohort receive the same variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Refresh succeeded; replay the original request with this token.
    Retry(AccessToken),
    /// Refresh failed or the session was torn down; do not replay.
    Invalid,
}
