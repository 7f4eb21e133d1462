//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories using Diesel ORM.
//! - **memory**: process-local repositories for database-less runs and tests.
//! - **credentials**: Argon2id password hashing.
//! - **session_store**: server-side state behind the session cookie.
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod credentials;
pub mod memory;
pub mod persistence;
pub mod session_store;
