// Providers layer - Work performers and business logic
//
// Providers perform self-contained work that coordinators orchestrate.

pub mod token_provider;

pub use token_provider::TokenProvider;
