// Types layer - All data structures
pub mod dto;
pub mod internal;
pub mod list_query;
pub mod schema;
