/// Router Module Index
///
/// Organizes the HTTP layer into the three surfaces the shell exposes.
/// Access control is not applied per-module here: the shell's guard decisions
/// live in the route table and dispatcher, and the navigation handler renders
/// or redirects accordingly.

/// Session lifecycle and liveness endpoints.
pub mod public;

/// Navigation routes for the shell views, registered from the route table.
pub mod shell;

/// The transient-message surface, decoupled from navigation.
pub mod notifications;
