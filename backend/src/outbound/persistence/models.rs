//! Internal Diesel row structs.
//!
//! User rows carry the plaintext secret code, so they do not derive `Debug`.

use diesel::prelude::*;

use crate::domain::ports::RecordStoreError;
use crate::domain::{
    Complaint, ComplaintDraft, ComplaintId, EmailAddress, SecretCode, User, UserId, UserName,
};

use super::schema::{complaints, users};

#[derive(Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: String,
    pub secret_code: String,
    pub name: String,
    pub email: String,
    pub complaint_ids: Vec<String>,
}

#[derive(Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: &'a str,
    pub secret_code: &'a str,
    pub name: &'a str,
    pub email: &'a str,
    pub complaint_ids: Vec<&'a str>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = complaints)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ComplaintRow {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub severity: i32,
    pub resolved: bool,
    pub user_id: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = complaints)]
pub(crate) struct NewComplaintRow<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub summary: &'a str,
    pub severity: i32,
    pub resolved: bool,
    pub user_id: &'a str,
}

fn corrupt(collection: &str, key: &str, err: impl std::fmt::Display) -> RecordStoreError {
    RecordStoreError::query(format!("stored {collection} row {key} is invalid: {err}"))
}

impl<'a> From<&'a User> for NewUserRow<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            id: user.id().as_str(),
            secret_code: user.secret_code().expose(),
            name: user.name().as_str(),
            email: user.email().as_str(),
            complaint_ids: user.complaint_ids().iter().map(ComplaintId::as_str).collect(),
        }
    }
}

impl TryFrom<UserRow> for User {
    type Error = RecordStoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let UserRow {
            id,
            secret_code,
            name,
            email,
            complaint_ids,
        } = row;
        let key = id.clone();
        let complaint_ids = complaint_ids
            .into_iter()
            .map(ComplaintId::new)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| corrupt("users", &key, err))?;
        Ok(User::with_complaints(
            UserId::new(id).map_err(|err| corrupt("users", &key, err))?,
            SecretCode::new(secret_code).map_err(|err| corrupt("users", &key, err))?,
            UserName::new(name).map_err(|err| corrupt("users", &key, err))?,
            EmailAddress::new(email).map_err(|err| corrupt("users", &key, err))?,
            complaint_ids,
        ))
    }
}

impl<'a> From<&'a Complaint> for NewComplaintRow<'a> {
    fn from(complaint: &'a Complaint) -> Self {
        Self {
            id: complaint.id().as_str(),
            title: complaint.title(),
            summary: complaint.summary(),
            severity: complaint.severity(),
            resolved: complaint.is_resolved(),
            user_id: complaint.user_id().as_str(),
        }
    }
}

impl TryFrom<ComplaintRow> for Complaint {
    type Error = RecordStoreError;

    fn try_from(row: ComplaintRow) -> Result<Self, Self::Error> {
        let ComplaintRow {
            id,
            title,
            summary,
            severity,
            resolved,
            user_id,
        } = row;
        let key = id.clone();
        Ok(Complaint::from_parts(
            ComplaintId::new(id).map_err(|err| corrupt("complaints", &key, err))?,
            UserId::new(user_id).map_err(|err| corrupt("complaints", &key, err))?,
            ComplaintDraft {
                title,
                summary,
                severity,
            },
            resolved,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn user_row(name: &str) -> UserRow {
        UserRow {
            id: "1f3a9c0e".into(),
            secret_code: "9b1d2e3f4a5c".into(),
            name: name.into(),
            email: "a@x.com".into(),
            complaint_ids: vec!["c1".into(), "c2".into()],
        }
    }

    #[rstest]
    fn user_row_converts_in_order() {
        let user = User::try_from(user_row("Alice")).expect("valid row");
        let ids: Vec<&str> = user.complaint_ids().iter().map(ComplaintId::as_str).collect();
        assert_eq!(ids, ["c1", "c2"]);
        assert_eq!(NewUserRow::from(&user).complaint_ids, ["c1", "c2"]);
    }

    #[rstest]
    fn blank_name_in_storage_is_a_query_error() {
        let err = User::try_from(user_row(" ")).expect_err("invalid row");
        assert!(matches!(err, RecordStoreError::Query { .. }));
    }

    #[rstest]
    fn complaint_row_keeps_resolution() {
        let row = ComplaintRow {
            id: "c1".into(),
            title: "Leak".into(),
            summary: "pipe".into(),
            severity: 2,
            resolved: true,
            user_id: "1f3a9c0e".into(),
        };
        let complaint = Complaint::try_from(row).expect("valid row");
        assert!(complaint.is_resolved());
        assert_eq!(NewComplaintRow::from(&complaint).severity, 2);
    }
}
