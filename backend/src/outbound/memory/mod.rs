//! In-process record store.
//!
//! Users and complaints live in `HashMap`s guarded by one
//! `tokio::sync::RwLock`, so every call is atomic on its own. Nothing is
//! durable: state is lost when the process exits. Used when no database URL
//! is configured and throughout the test suites.

use std::collections::HashMap;
use std::hash::Hash;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{
    ComplaintFieldUpdate, ComplaintPredicate, RecordStore, RecordStoreError, UniqueField,
    UserFieldUpdate, UserPredicate,
};
use crate::domain::{Complaint, ComplaintId, User, UserId};

/// Keyed records that remember insertion order for scans.
#[derive(Debug)]
struct Collection<K, V> {
    order: Vec<K>,
    records: HashMap<K, V>,
}

impl<K, V> Default for Collection<K, V> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            records: HashMap::new(),
        }
    }
}

impl<K, V> Collection<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn get(&self, key: &K) -> Option<V> {
        self.records.get(key).cloned()
    }

    /// Insert a new record; returns `false` and leaves the map untouched when
    /// the key is already taken.
    fn insert(&mut self, key: K, value: V) -> bool {
        if self.records.contains_key(&key) {
            return false;
        }
        self.records.insert(key.clone(), value);
        self.order.push(key);
        true
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.records.get_mut(key)
    }

    fn scan(&self, mut keep: impl FnMut(&V) -> bool) -> Vec<V> {
        self.order
            .iter()
            .filter_map(|key| self.records.get(key))
            .filter(|value| keep(*value))
            .cloned()
            .collect()
    }

    fn values(&self) -> impl Iterator<Item = &V> {
        self.records.values()
    }
}

#[derive(Debug, Default)]
struct Tables {
    users: Collection<UserId, User>,
    complaints: Collection<ComplaintId, Complaint>,
}

/// Map-backed [`RecordStore`].
///
/// # Examples
/// ```
/// use complaint_portal::outbound::memory::InMemoryRecordStore;
///
/// let store = InMemoryRecordStore::new();
/// # let _ = store;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    tables: RwLock<Tables>,
}

impl InMemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn unique_conflict(user: &User, other: &User) -> Option<RecordStoreError> {
    let field = if other.id() == user.id() {
        UniqueField::Id
    } else if other.email() == user.email() {
        UniqueField::Email
    } else if other.secret_code() == user.secret_code() {
        UniqueField::SecretCode
    } else {
        return None;
    };
    Some(RecordStoreError::conflict(
        field,
        format!("{field} already held by user {}", other.id()),
    ))
}

fn duplicate_key(collection: &str, key: &str) -> RecordStoreError {
    RecordStoreError::conflict(
        UniqueField::Id,
        format!("{collection} record with key {key} already exists"),
    )
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, RecordStoreError> {
        Ok(self.tables.read().await.users.get(id))
    }

    async fn put_user(&self, user: &User) -> Result<(), RecordStoreError> {
        let mut tables = self.tables.write().await;
        if let Some(conflict) = tables
            .users
            .values()
            .find_map(|other| unique_conflict(user, other))
        {
            return Err(conflict);
        }
        if !tables.users.insert(user.id().clone(), user.clone()) {
            return Err(duplicate_key("users", user.id().as_str()));
        }
        Ok(())
    }

    async fn scan_users(&self, predicate: &UserPredicate) -> Result<Vec<User>, RecordStoreError> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .scan(|user| predicate.matches(user)))
    }

    async fn update_user(
        &self,
        id: &UserId,
        update: &UserFieldUpdate,
    ) -> Result<(), RecordStoreError> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .get_mut(id)
            .ok_or_else(|| RecordStoreError::missing_record("users", id.as_str()))?;
        update.apply(user);
        Ok(())
    }

    async fn find_complaint(
        &self,
        id: &ComplaintId,
    ) -> Result<Option<Complaint>, RecordStoreError> {
        Ok(self.tables.read().await.complaints.get(id))
    }

    async fn put_complaint(&self, complaint: &Complaint) -> Result<(), RecordStoreError> {
        let mut tables = self.tables.write().await;
        if !tables
            .complaints
            .insert(complaint.id().clone(), complaint.clone())
        {
            return Err(duplicate_key("complaints", complaint.id().as_str()));
        }
        Ok(())
    }

    async fn scan_complaints(
        &self,
        predicate: &ComplaintPredicate,
    ) -> Result<Vec<Complaint>, RecordStoreError> {
        Ok(self
            .tables
            .read()
            .await
            .complaints
            .scan(|complaint| predicate.matches(complaint)))
    }

    async fn update_complaint(
        &self,
        id: &ComplaintId,
        update: &ComplaintFieldUpdate,
    ) -> Result<(), RecordStoreError> {
        let mut tables = self.tables.write().await;
        let complaint = tables
            .complaints
            .get_mut(id)
            .ok_or_else(|| RecordStoreError::missing_record("complaints", id.as_str()))?;
        update.apply(complaint);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ComplaintDraft, EmailAddress, SecretCode, UserName};
    use rstest::{fixture, rstest};

    fn user(id: &str, secret: &str, email: &str) -> User {
        User::new(
            UserId::new(id).expect("id"),
            SecretCode::new(secret).expect("secret"),
            UserName::new("Alice").expect("name"),
            EmailAddress::new(email).expect("email"),
        )
    }

    fn complaint(id: &str, owner: &str) -> Complaint {
        Complaint::submit(
            ComplaintId::new(id).expect("id"),
            UserId::new(owner).expect("id"),
            ComplaintDraft {
                title: format!("title {id}"),
                summary: "summary".into(),
                severity: 1,
            },
        )
    }

    #[fixture]
    fn store() -> InMemoryRecordStore {
        InMemoryRecordStore::new()
    }

    #[rstest]
    #[tokio::test]
    async fn put_then_find_user(store: InMemoryRecordStore) {
        let alice = user("u1", "s1", "a@x.com");
        store.put_user(&alice).await.expect("put");
        let found = store
            .find_user(alice.id())
            .await
            .expect("find")
            .expect("present");
        assert_eq!(found, alice);
    }

    #[rstest]
    #[case(user("u2", "s2", "a@x.com"), UniqueField::Email)]
    #[case(user("u2", "s1", "b@x.com"), UniqueField::SecretCode)]
    #[case(user("u1", "s1", "a@x.com"), UniqueField::Id)]
    #[case(user("u1", "s9", "z@x.com"), UniqueField::Id)]
    #[tokio::test]
    async fn put_user_rejects_taken_unique_fields(
        store: InMemoryRecordStore,
        #[case] clash: User,
        #[case] expected: UniqueField,
    ) {
        let alice = user("u1", "s1", "a@x.com");
        store.put_user(&alice).await.expect("put");
        let err = store.put_user(&clash).await.expect_err("conflict");
        assert!(matches!(err, RecordStoreError::Conflict { field, .. } if field == expected));

        let all = store.scan_users(&UserPredicate::All).await.expect("scan");
        assert_eq!(all, vec![alice]);
    }

    #[rstest]
    #[tokio::test]
    async fn put_complaint_rejects_existing_key(store: InMemoryRecordStore) {
        let leak = complaint("c1", "u1");
        store.put_complaint(&leak).await.expect("put");
        store
            .update_complaint(leak.id(), &ComplaintFieldUpdate::Resolved)
            .await
            .expect("resolve");

        let err = store
            .put_complaint(&complaint("c1", "u2"))
            .await
            .expect_err("duplicate key");
        assert!(matches!(
            err,
            RecordStoreError::Conflict {
                field: UniqueField::Id,
                ..
            }
        ));
        let stored = store
            .find_complaint(leak.id())
            .await
            .expect("find")
            .expect("present");
        assert!(stored.is_resolved());
        assert_eq!(stored.user_id().as_str(), "u1");
    }

    #[rstest]
    #[tokio::test]
    async fn scans_follow_insertion_order(store: InMemoryRecordStore) {
        for id in ["c3", "c1", "c2"] {
            store
                .put_complaint(&complaint(id, "u1"))
                .await
                .expect("put");
        }
        let ids: Vec<String> = store
            .scan_complaints(&ComplaintPredicate::All)
            .await
            .expect("scan")
            .iter()
            .map(|c| c.id().to_string())
            .collect();
        assert_eq!(ids, ["c3", "c1", "c2"]);
    }

    #[rstest]
    #[tokio::test]
    async fn update_missing_records_fail(store: InMemoryRecordStore) {
        let user_err = store
            .update_user(
                &UserId::new("nobody").expect("id"),
                &UserFieldUpdate::AppendComplaintId(ComplaintId::new("c1").expect("id")),
            )
            .await
            .expect_err("missing user");
        let complaint_err = store
            .update_complaint(
                &ComplaintId::new("c1").expect("id"),
                &ComplaintFieldUpdate::Resolved,
            )
            .await
            .expect_err("missing complaint");
        assert!(matches!(user_err, RecordStoreError::MissingRecord { .. }));
        assert!(matches!(complaint_err, RecordStoreError::MissingRecord { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn field_updates_persist(store: InMemoryRecordStore) {
        let alice = user("u1", "s1", "a@x.com");
        let leak = complaint("c1", "u1");
        store.put_user(&alice).await.expect("put user");
        store.put_complaint(&leak).await.expect("put complaint");

        store
            .update_user(
                alice.id(),
                &UserFieldUpdate::AppendComplaintId(leak.id().clone()),
            )
            .await
            .expect("append");
        store
            .update_complaint(leak.id(), &ComplaintFieldUpdate::Resolved)
            .await
            .expect("resolve");

        let alice = store
            .find_user(alice.id())
            .await
            .expect("find")
            .expect("present");
        let leak = store
            .find_complaint(leak.id())
            .await
            .expect("find")
            .expect("present");
        assert_eq!(alice.complaint_ids(), &[leak.id().clone()]);
        assert!(leak.is_resolved());
    }

    #[rstest]
    #[tokio::test]
    async fn scan_users_by_secret(store: InMemoryRecordStore) {
        store
            .put_user(&user("u1", "s1", "a@x.com"))
            .await
            .expect("put");
        store
            .put_user(&user("u2", "s2", "b@x.com"))
            .await
            .expect("put");
        let hits = store
            .scan_users(&UserPredicate::SecretCode(SecretCode::new("s2").expect("secret")))
            .await
            .expect("scan");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id().as_str(), "u2");
    }
}
