//! Random hexadecimal identity generator.

use rand::RngCore;

use crate::domain::ports::IdentityGenerator;

/// Random bytes drawn for entity identifiers (8 hex characters).
pub const ENTITY_ID_BYTES: usize = 4;
/// Random bytes drawn for login secrets (12 hex characters).
pub const SECRET_CODE_BYTES: usize = 6;

/// [`IdentityGenerator`] backed by the thread-local CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomHexIdentityGenerator;

impl RandomHexIdentityGenerator {
    fn draw<const N: usize>() -> String {
        let mut bytes = [0_u8; N];
        rand::thread_rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}

impl IdentityGenerator for RandomHexIdentityGenerator {
    fn entity_id(&self) -> String {
        Self::draw::<ENTITY_ID_BYTES>()
    }

    fn secret_code(&self) -> String {
        Self::draw::<SECRET_CODE_BYTES>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn is_lower_hex(value: &str) -> bool {
        value
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    }

    #[rstest]
    fn entity_ids_are_eight_hex_chars() {
        let id = RandomHexIdentityGenerator.entity_id();
        assert_eq!(id.len(), 8);
        assert!(is_lower_hex(&id), "unexpected id {id}");
    }

    #[rstest]
    fn secret_codes_are_twelve_hex_chars() {
        let secret = RandomHexIdentityGenerator.secret_code();
        assert_eq!(secret.len(), 12);
        assert!(is_lower_hex(&secret), "unexpected secret {secret}");
    }
}
