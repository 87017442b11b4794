//! Application layer - Use case services.
//!
//! Services are thin orchestrators that:
//! - Accept domain types as inputs
//! - Use ports (traits) for OS access
//! - Return domain types as outputs

mod snipe_service;

pub use snipe_service::{PlatformSnipeService, SnipeService};
