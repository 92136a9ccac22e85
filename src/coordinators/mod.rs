// Coordinators layer - Workflow orchestration
//
// Coordinators sequence store and provider calls for specific API endpoints
// and emit activity events once a write has committed.

pub mod auth_coordinator;
pub mod record_coordinator;
pub mod user_coordinator;

pub use auth_coordinator::{require_role, AuthCoordinator};
pub use record_coordinator::RecordCoordinator;
pub use user_coordinator::UserCoordinator;
