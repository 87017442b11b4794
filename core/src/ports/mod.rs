//! Ports layer - Trait definitions (interfaces).
//!
//! This module defines the interfaces that the application layer uses
//! to interact with the operating system. Implementations live in `adapters`.

mod command;
mod inspector;
mod killer;
mod resolver;

pub use command::CommandRunner;
pub use inspector::ProcessInspector;
pub use killer::{ProcessKillerPort, Signaller};
pub use resolver::ListenerResolver;
