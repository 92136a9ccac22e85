pub mod client_info;
pub mod request_context;

pub use client_info::{browser_family, client_ip, ClientInfo};
pub use request_context::{RequestContext, RequestId};
