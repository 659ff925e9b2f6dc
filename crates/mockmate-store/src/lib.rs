//! mockmate-store — document store implementations.
//!
//! `LocalStore` keeps everything in process memory with optional JSON-file
//! persistence; `FirestoreStore` talks to the Firestore REST API. Both
//! implement `mockmate_core::traits::InterviewStore`.

pub mod config;
pub mod firestore;
pub mod local;

pub use config::{create_store, StoreConfig};
pub use firestore::FirestoreStore;
pub use local::LocalStore;
