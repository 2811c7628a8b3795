//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports ([`RecordStore`], [`IdentityGenerator`]) are implemented by
//! outbound adapters. Driving ports ([`UserAccounts`], [`LoginService`],
//! [`ComplaintCommand`], [`ComplaintQuery`]) are implemented by the portal
//! service and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod complaint_command;
mod complaint_query;
mod identity_generator;
mod login_service;
mod record_store;
mod user_accounts;

#[cfg(test)]
pub use complaint_command::MockComplaintCommand;
pub use complaint_command::{COMPLAINT_RESOLVED_MESSAGE, ComplaintCommand};
#[cfg(test)]
pub use complaint_query::MockComplaintQuery;
pub use complaint_query::ComplaintQuery;
#[cfg(test)]
pub use identity_generator::MockIdentityGenerator;
pub use identity_generator::{FixtureIdentityGenerator, IdentityGenerator};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use record_store::MockRecordStore;
pub use record_store::{
    ComplaintFieldUpdate, ComplaintPredicate, RecordStore, RecordStoreError, UniqueField,
    UserFieldUpdate, UserPredicate,
};
#[cfg(test)]
pub use user_accounts::MockUserAccounts;
pub use user_accounts::UserAccounts;
