/// Router Module Index
///
/// Organizes the routing logic into security-segregated modules so access
/// control is applied explicitly at the module level (via axum layers) and a
/// protected endpoint cannot be exposed by accident.

/// Routes accessible to any client, anonymous included. Visibility rules for
/// anonymous reads are enforced by the guard and the repository queries.
pub mod public;

/// Routes protected by the `Principal` extractor middleware.
/// Requires a validated identity.
pub mod authenticated;
