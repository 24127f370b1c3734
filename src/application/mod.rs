// SPDX-License-Identifier: MPL-2.0
//! Application layer - Use cases and orchestration.
//!
//! This module contains the application layer of the Clean Architecture:
//!
//! - [`port`]: Trait definitions (interfaces) for dependency inversion
//! - [`gateway`]: The pin listing and creation flow shared by every backend
//! - [`timeline`]: Read-side ordering of pins for display
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - Presentation layer uses application layer services
//!
//! # Example
//!
//! ```ignore
//! use wayfarer::application::gateway::StoreGateway;
//! use wayfarer::application::port::PinGateway;
//! use wayfarer::infrastructure::memory::MemoryStore;
//!
//! let gateway = StoreGateway::new(MemoryStore::default());
//! let pins = gateway.list(Some(&session)).await;
//! ```

pub mod gateway;
pub mod port;
pub mod timeline;
