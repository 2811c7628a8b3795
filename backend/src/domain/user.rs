//! User data model.
//!
//! A [`User`] is created by registration, mutated only by appending complaint
//! identifiers, and never deleted. Identifiers and secret codes are immutable
//! after creation.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::complaint::ComplaintId;

/// Validation errors raised by the user newtypes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptySecretCode,
    InvalidSecretCode,
    EmptyName,
    EmptyEmail,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must not contain whitespace"),
            Self::EmptySecretCode => write!(f, "secret code must not be empty"),
            Self::InvalidSecretCode => write!(f, "secret code must not contain whitespace"),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

fn has_whitespace(value: &str) -> bool {
    value.chars().any(char::is_whitespace)
}

/// Opaque user identifier issued at registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    ///
    /// # Examples
    /// ```
    /// use complaint_portal::domain::UserId;
    ///
    /// assert!(UserId::new("a1b2c3d4").is_ok());
    /// assert!(UserId::new("a1 b2").is_err());
    /// ```
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if has_whitespace(&id) {
            return Err(UserValidationError::InvalidId);
        }
        Ok(Self(id))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Login secret issued once at registration.
///
/// The backing buffer is wiped on drop. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretCode(Zeroizing<String>);

impl SecretCode {
    /// Validate and construct a [`SecretCode`].
    pub fn new(code: impl Into<String>) -> Result<Self, UserValidationError> {
        let code = Zeroizing::new(code.into());
        if code.is_empty() {
            return Err(UserValidationError::EmptySecretCode);
        }
        if has_whitespace(&code) {
            return Err(UserValidationError::InvalidSecretCode);
        }
        Ok(Self(code))
    }

    /// Reveal the secret for comparison or storage. Never log the result.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SecretCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretCode(<redacted>)")
    }
}

impl Serialize for SecretCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.expose())
    }
}

impl<'de> Deserialize<'de> for SecretCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Display name supplied at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate a display name; blank input is rejected.
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        Ok(Self(name))
    }

    /// Borrow the name as entered.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Contact address; uniqueness is compared byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate an address; only blank input is rejected.
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        if email.trim().is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        Ok(Self(email))
    }

    /// Borrow the address as entered.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Registered account.
///
/// ## Invariants
/// - `id` and `secret_code` are unique across all users.
/// - `complaint_ids` references only complaints owned by this user, in
///   submission order.
///
/// Serialised with camelCase keys:
/// `{ "id", "secretCode", "name", "email", "complaintIds" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(value_type = String, example = "1f3a9c0e")]
    id: UserId,
    #[schema(value_type = String, example = "9b1d2e3f4a5c")]
    secret_code: SecretCode,
    #[schema(value_type = String, example = "Alice")]
    name: UserName,
    #[schema(value_type = String, example = "alice@example.com")]
    email: EmailAddress,
    #[schema(value_type = Vec<String>)]
    complaint_ids: Vec<ComplaintId>,
}

impl User {
    /// Freshly registered user with no complaints.
    pub fn new(id: UserId, secret_code: SecretCode, name: UserName, email: EmailAddress) -> Self {
        Self::with_complaints(id, secret_code, name, email, Vec::new())
    }

    /// Rehydrate a user from storage.
    pub fn with_complaints(
        id: UserId,
        secret_code: SecretCode,
        name: UserName,
        email: EmailAddress,
        complaint_ids: Vec<ComplaintId>,
    ) -> Self {
        Self {
            id,
            secret_code,
            name,
            email,
            complaint_ids,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Login secret; see [`SecretCode::expose`].
    pub fn secret_code(&self) -> &SecretCode {
        &self.secret_code
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Owned complaint ids in submission order.
    pub fn complaint_ids(&self) -> &[ComplaintId] {
        &self.complaint_ids
    }

    /// Whether `complaint_id` is already listed for this user.
    pub fn owns_complaint(&self, complaint_id: &ComplaintId) -> bool {
        self.complaint_ids.contains(complaint_id)
    }

    /// Append a complaint reference, ignoring duplicates.
    pub fn push_complaint(&mut self, complaint_id: ComplaintId) {
        if !self.owns_complaint(&complaint_id) {
            self.complaint_ids.push(complaint_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn alice() -> User {
        User::new(
            UserId::new("1f3a9c0e").expect("valid id"),
            SecretCode::new("9b1d2e3f4a5c").expect("valid secret"),
            UserName::new("Alice").expect("valid name"),
            EmailAddress::new("alice@example.com").expect("valid email"),
        )
    }

    #[rstest]
    #[case("", UserValidationError::EmptyId)]
    #[case("ab cd", UserValidationError::InvalidId)]
    #[case(" abcd", UserValidationError::InvalidId)]
    fn user_id_rejects_invalid(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(UserId::new(raw), Err(expected));
    }

    #[rstest]
    #[case("", UserValidationError::EmptySecretCode)]
    #[case("abc\tdef", UserValidationError::InvalidSecretCode)]
    fn secret_code_rejects_invalid(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(SecretCode::new(raw).err(), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn name_and_email_reject_blank(#[case] raw: &str) {
        assert_eq!(UserName::new(raw), Err(UserValidationError::EmptyName));
        assert_eq!(EmailAddress::new(raw), Err(UserValidationError::EmptyEmail));
    }

    #[rstest]
    fn email_comparison_is_case_sensitive() {
        let lower = EmailAddress::new("a@x.com").expect("valid");
        let upper = EmailAddress::new("A@x.com").expect("valid");
        assert_ne!(lower, upper);
    }

    #[rstest]
    fn secret_code_debug_is_redacted() {
        let secret = SecretCode::new("9b1d2e3f4a5c").expect("valid secret");
        assert!(!format!("{secret:?}").contains("9b1d"));
    }

    #[rstest]
    fn serialises_with_camel_case_keys(mut alice: User) {
        alice.push_complaint(ComplaintId::new("c0ffee00").expect("valid id"));
        let value = serde_json::to_value(&alice).expect("user serialises");
        assert_eq!(
            value,
            json!({
                "id": "1f3a9c0e",
                "secretCode": "9b1d2e3f4a5c",
                "name": "Alice",
                "email": "alice@example.com",
                "complaintIds": ["c0ffee00"],
            })
        );
    }

    #[rstest]
    fn push_complaint_ignores_duplicates(mut alice: User) {
        let id = ComplaintId::new("c0ffee00").expect("valid id");
        alice.push_complaint(id.clone());
        alice.push_complaint(id.clone());
        assert_eq!(alice.complaint_ids(), &[id]);
    }

    #[rstest]
    fn deserialise_rejects_blank_name() {
        let payload = json!({
            "id": "1f3a9c0e",
            "secretCode": "9b1d2e3f4a5c",
            "name": " ",
            "email": "alice@example.com",
            "complaintIds": [],
        });
        assert!(serde_json::from_value::<User>(payload).is_err());
    }
}
