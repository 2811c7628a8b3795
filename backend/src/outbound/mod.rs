//! Outbound adapters implementing the driven ports.
//!
//! - **memory**: process-local record store
//! - **persistence**: PostgreSQL record store using Diesel
//! - **identity**: random hexadecimal identifiers and secrets
//!
//! Adapters translate between domain types and storage representations and
//! contain no business rules.

pub mod identity;
pub mod memory;
pub mod persistence;
