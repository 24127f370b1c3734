// SPDX-License-Identifier: MPL-2.0
//! Firebase backend: Firestore documents, Cloud Storage photos and
//! Identity Toolkit authentication, all over their REST APIs.

pub mod auth;
pub mod document;
pub mod store;

pub use auth::FirebaseAuth;
pub use store::FirebaseStore;
