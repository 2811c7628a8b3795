//! Complaint portal domain service.
//!
//! Implements every driving port on top of a [`RecordStore`] and an
//! [`IdentityGenerator`]. Each operation re-reads current state, decides and
//! writes back while holding the write gate: the exclusive side for
//! registration, submission and resolution, the shared side for reads. The
//! service keeps no copies of records between calls.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::domain::ports::{
    COMPLAINT_RESOLVED_MESSAGE, ComplaintCommand, ComplaintFieldUpdate, ComplaintPredicate,
    ComplaintQuery, IdentityGenerator, LoginService, RecordStore, RecordStoreError, UniqueField,
    UserAccounts, UserFieldUpdate, UserPredicate,
};
use crate::domain::{
    AdminComplaintSummary, Complaint, ComplaintDraft, ComplaintId, EmailAddress, Error,
    SecretCode, User, UserId, UserName,
};

/// Attempts made to draw a non-colliding identifier before giving up.
pub const MAX_ALLOCATION_ATTEMPTS: usize = 8;

pub(crate) const NAME_AND_EMAIL_REQUIRED: &str = "Name and Email are required";
pub(crate) const EMAIL_ALREADY_REGISTERED: &str = "Email already registered";
pub(crate) const INVALID_SECRET_CODE: &str = "Invalid secret code";
pub(crate) const UNAUTHORIZED_SECRET_CODE: &str = "Unauthorized: Invalid secret code";
pub(crate) const COMPLAINT_NOT_FOUND: &str = "Complaint not found";
pub(crate) const NOT_COMPLAINT_OWNER: &str = "You are not the owner of this complaint";

/// Authorization-and-consistency core of the portal.
///
/// Clones share the store, the generator and the write gate.
pub struct ComplaintPortalService<S, G> {
    store: Arc<S>,
    generator: Arc<G>,
    write_gate: Arc<RwLock<()>>,
}

impl<S, G> Clone for ComplaintPortalService<S, G> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            generator: Arc::clone(&self.generator),
            write_gate: Arc::clone(&self.write_gate),
        }
    }
}

impl<S, G> ComplaintPortalService<S, G> {
    /// Create a service over the given store and generator.
    pub fn new(store: Arc<S>, generator: Arc<G>) -> Self {
        Self {
            store,
            generator,
            write_gate: Arc::new(RwLock::new(())),
        }
    }
}

impl<S, G> ComplaintPortalService<S, G>
where
    S: RecordStore,
    G: IdentityGenerator,
{
    fn map_store_error(error: RecordStoreError) -> Error {
        error!(error = %error, "record store call failed");
        match error {
            RecordStoreError::Connection { message } => {
                Error::internal(format!("record store unavailable: {message}"))
            }
            RecordStoreError::Query { message } => {
                Error::internal(format!("record store error: {message}"))
            }
            RecordStoreError::Conflict { field, message } => {
                Error::internal(format!("unexpected record store conflict on {field}: {message}"))
            }
            RecordStoreError::MissingRecord { collection, key } => {
                Error::internal(format!("{collection} record {key} vanished during update"))
            }
        }
    }

    /// Resolve the user holding `secret`, or fail with `unauthorized`.
    async fn authenticate(&self, secret: &str, rejection: &str) -> Result<User, Error> {
        let Ok(secret) = SecretCode::new(secret) else {
            return Err(Error::unauthorized(rejection));
        };
        let matches = self
            .store
            .scan_users(&UserPredicate::SecretCode(secret))
            .await
            .map_err(Self::map_store_error)?;
        if matches.len() > 1 {
            warn!(count = matches.len(), "secret code shared by several users");
        }
        match matches.into_iter().next() {
            Some(user) => Ok(user),
            None => Err(Error::unauthorized(rejection)),
        }
    }

    fn exhausted(kind: &str) -> Error {
        error!(kind, attempts = MAX_ALLOCATION_ATTEMPTS, "identifier allocation exhausted");
        Error::internal(format!(
            "could not allocate a unique {kind} after {MAX_ALLOCATION_ATTEMPTS} attempts"
        ))
    }

    async fn allocate_user_id(&self) -> Result<UserId, Error> {
        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let Ok(id) = UserId::new(self.generator.entity_id()) else {
                debug!(attempt, "generator produced an unusable user id");
                continue;
            };
            let existing = self
                .store
                .find_user(&id)
                .await
                .map_err(Self::map_store_error)?;
            if existing.is_none() {
                return Ok(id);
            }
            debug!(attempt, "user id collision");
        }
        Err(Self::exhausted("user id"))
    }

    async fn allocate_secret_code(&self) -> Result<SecretCode, Error> {
        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let Ok(secret) = SecretCode::new(self.generator.secret_code()) else {
                debug!(attempt, "generator produced an unusable secret code");
                continue;
            };
            let holders = self
                .store
                .scan_users(&UserPredicate::SecretCode(secret.clone()))
                .await
                .map_err(Self::map_store_error)?;
            if holders.is_empty() {
                return Ok(secret);
            }
            debug!(attempt, "secret code collision");
        }
        Err(Self::exhausted("secret code"))
    }

    async fn allocate_complaint_id(&self) -> Result<ComplaintId, Error> {
        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let Ok(id) = ComplaintId::new(self.generator.entity_id()) else {
                debug!(attempt, "generator produced an unusable complaint id");
                continue;
            };
            let existing = self
                .store
                .find_complaint(&id)
                .await
                .map_err(Self::map_store_error)?;
            if existing.is_none() {
                return Ok(id);
            }
            debug!(attempt, "complaint id collision");
        }
        Err(Self::exhausted("complaint id"))
    }

    async fn load_complaint(&self, raw_id: &str) -> Result<Complaint, Error> {
        let Ok(id) = ComplaintId::new(raw_id) else {
            return Err(Error::not_found(COMPLAINT_NOT_FOUND));
        };
        self.store
            .find_complaint(&id)
            .await
            .map_err(Self::map_store_error)?
            .ok_or_else(|| Error::not_found(COMPLAINT_NOT_FOUND))
    }
}

#[async_trait]
impl<S, G> UserAccounts for ComplaintPortalService<S, G>
where
    S: RecordStore,
    G: IdentityGenerator,
{
    async fn register(&self, name: &str, email: &str) -> Result<User, Error> {
        info!(name, "received register request");
        let (name, email) = match (UserName::new(name), EmailAddress::new(email)) {
            (Ok(name), Ok(email)) => (name, email),
            (name, email) => {
                let missing: Vec<&str> = [("name", name.is_err()), ("email", email.is_err())]
                    .into_iter()
                    .filter_map(|(field, missing)| missing.then_some(field))
                    .collect();
                return Err(Error::invalid_request(NAME_AND_EMAIL_REQUIRED)
                    .with_details(json!({ "missing": missing })));
            }
        };

        let _gate = self.write_gate.write().await;

        let holders = self
            .store
            .scan_users(&UserPredicate::Email(email.clone()))
            .await
            .map_err(Self::map_store_error)?;
        if !holders.is_empty() {
            return Err(Error::already_exists(EMAIL_ALREADY_REGISTERED));
        }

        let id = self.allocate_user_id().await?;
        let secret = self.allocate_secret_code().await?;
        let user = User::new(id, secret, name, email);

        match self.store.put_user(&user).await {
            Ok(()) => {
                info!(user_id = %user.id(), "registered user");
                Ok(user)
            }
            Err(RecordStoreError::Conflict {
                field: UniqueField::Email,
                message,
            }) => {
                debug!(%message, "store rejected duplicate registration");
                Err(Error::already_exists(EMAIL_ALREADY_REGISTERED))
            }
            Err(err) => Err(Self::map_store_error(err)),
        }
    }
}

#[async_trait]
impl<S, G> LoginService for ComplaintPortalService<S, G>
where
    S: RecordStore,
    G: IdentityGenerator,
{
    async fn login(&self, secret_code: &str) -> Result<User, Error> {
        info!("received login request");
        let _gate = self.write_gate.read().await;
        self.authenticate(secret_code, INVALID_SECRET_CODE).await
    }
}

#[async_trait]
impl<S, G> ComplaintCommand for ComplaintPortalService<S, G>
where
    S: RecordStore,
    G: IdentityGenerator,
{
    async fn submit(&self, secret_code: &str, draft: ComplaintDraft) -> Result<Complaint, Error> {
        info!(title = %draft.title, severity = draft.severity, "received submit complaint request");
        let _gate = self.write_gate.write().await;

        let owner = self
            .authenticate(secret_code, UNAUTHORIZED_SECRET_CODE)
            .await?;
        let id = self.allocate_complaint_id().await?;
        let complaint = Complaint::submit(id, owner.id().clone(), draft);

        self.store
            .put_complaint(&complaint)
            .await
            .map_err(Self::map_store_error)?;

        let append = UserFieldUpdate::AppendComplaintId(complaint.id().clone());
        if let Err(err) = self.store.update_user(owner.id(), &append).await {
            error!(
                error = %err,
                complaint_id = %complaint.id(),
                user_id = %owner.id(),
                "complaint stored but owner list not updated"
            );
            return Err(Error::internal(format!(
                "complaint {} was stored but the owner's complaint list was not updated",
                complaint.id()
            ))
            .with_details(json!({
                "stage": "append_complaint_id",
                "complaintId": complaint.id(),
            })));
        }

        info!(complaint_id = %complaint.id(), user_id = %owner.id(), "complaint submitted");
        Ok(complaint)
    }

    async fn resolve(&self, complaint_id: &str) -> Result<String, Error> {
        info!(complaint_id, "received resolve complaint request");
        let _gate = self.write_gate.write().await;

        let complaint = self.load_complaint(complaint_id).await?;
        match self
            .store
            .update_complaint(complaint.id(), &ComplaintFieldUpdate::Resolved)
            .await
        {
            Ok(()) => Ok(COMPLAINT_RESOLVED_MESSAGE.to_owned()),
            Err(RecordStoreError::MissingRecord { .. }) => {
                Err(Error::not_found(COMPLAINT_NOT_FOUND))
            }
            Err(err) => Err(Self::map_store_error(err)),
        }
    }
}

#[async_trait]
impl<S, G> ComplaintQuery for ComplaintPortalService<S, G>
where
    S: RecordStore,
    G: IdentityGenerator,
{
    async fn user_complaints(&self, secret_code: &str) -> Result<Vec<Complaint>, Error> {
        info!("received list complaints request");
        let _gate = self.write_gate.read().await;

        let owner = self
            .authenticate(secret_code, UNAUTHORIZED_SECRET_CODE)
            .await?;
        if owner.complaint_ids().is_empty() {
            return Ok(Vec::new());
        }

        let found = self
            .store
            .scan_complaints(&ComplaintPredicate::Ids(owner.complaint_ids().to_vec()))
            .await
            .map_err(Self::map_store_error)?;
        let mut by_id: HashMap<ComplaintId, Complaint> = found
            .into_iter()
            .map(|complaint| (complaint.id().clone(), complaint))
            .collect();

        let complaints: Vec<Complaint> = owner
            .complaint_ids()
            .iter()
            .filter_map(|id| by_id.remove(id))
            .collect();
        if complaints.len() < owner.complaint_ids().len() {
            warn!(
                user_id = %owner.id(),
                listed = owner.complaint_ids().len(),
                found = complaints.len(),
                "skipping stale complaint references"
            );
        }
        Ok(complaints)
    }

    async fn admin_complaints(&self) -> Result<Vec<AdminComplaintSummary>, Error> {
        info!("received admin complaints request");
        let _gate = self.write_gate.read().await;

        let users = self
            .store
            .scan_users(&UserPredicate::All)
            .await
            .map_err(Self::map_store_error)?;
        let owners: HashMap<UserId, UserName> = users
            .into_iter()
            .map(|user| (user.id().clone(), user.name().clone()))
            .collect();

        let complaints = self
            .store
            .scan_complaints(&ComplaintPredicate::All)
            .await
            .map_err(Self::map_store_error)?;

        Ok(complaints
            .into_iter()
            .filter_map(|complaint| match owners.get(complaint.user_id()) {
                Some(owner_name) => Some(AdminComplaintSummary {
                    title: complaint.title().to_owned(),
                    owner_name: owner_name.clone(),
                }),
                None => {
                    debug!(complaint_id = %complaint.id(), "skipping orphaned complaint");
                    None
                }
            })
            .collect())
    }

    async fn view(&self, secret_code: &str, complaint_id: &str) -> Result<Complaint, Error> {
        info!(complaint_id, "received view complaint request");
        let _gate = self.write_gate.read().await;

        let complaint = self.load_complaint(complaint_id).await?;
        let caller = self
            .authenticate(secret_code, UNAUTHORIZED_SECRET_CODE)
            .await?;
        if !complaint.is_owned_by(caller.id()) {
            return Err(Error::permission_denied(NOT_COMPLAINT_OWNER));
        }
        Ok(complaint)
    }
}

#[cfg(test)]
#[path = "complaint_portal_service_tests.rs"]
mod tests;
