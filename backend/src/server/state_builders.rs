//! Wire driving ports to the configured record store.

use std::sync::Arc;

use tracing::info;

use crate::domain::ComplaintPortalService;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::identity::RandomHexIdentityGenerator;
use crate::outbound::memory::InMemoryRecordStore;
use crate::outbound::persistence::DieselRecordStore;

use super::ServerConfig;

fn build_ports(config: &ServerConfig) -> HttpStatePorts {
    let generator = Arc::new(RandomHexIdentityGenerator);
    match &config.db_pool {
        Some(pool) => {
            info!(store = "postgres", "record store selected");
            HttpStatePorts::from_service(Arc::new(ComplaintPortalService::new(
                Arc::new(DieselRecordStore::new(pool.clone())),
                generator,
            )))
        }
        None => {
            info!(store = "memory", "record store selected");
            HttpStatePorts::from_service(Arc::new(ComplaintPortalService::new(
                Arc::new(InMemoryRecordStore::new()),
                generator,
            )))
        }
    }
}

/// Build handler state shared by every worker.
pub(crate) fn build_http_state(config: &ServerConfig) -> HttpState {
    HttpState::new(build_ports(config), config.admin_token.clone())
}
