pub mod audit;
pub mod auth;
pub mod context;

pub use auth::{Claims, Role, User};
pub use context::{ClientInfo, RequestContext};
