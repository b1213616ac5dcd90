use anyhow::Result;
use rand::{distr::Alphanumeric, Rng};

const TEMP_PASSWORD_LEN: usize = 8;

/// One-way, salted hash; cost comes from settings.
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    Ok(bcrypt::hash(password, cost)?)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    Ok(bcrypt::verify(password, hash)?)
}

/// Short random human-typable password for resets and new dealer accounts.
pub fn generate_temp_password() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TEMP_PASSWORD_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost keeps the tests quick.
    const TEST_COST: u32 = 4;

    #[test]
    fn hash_verifies_only_the_original_password() {
        let hash = hash_password("s3cret", TEST_COST).unwrap();
        assert!(verify_password("s3cret", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("s3cret", TEST_COST).unwrap();
        let b = hash_password("s3cret", TEST_COST).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn temp_passwords_are_short_and_typable() {
        let password = generate_temp_password();
        assert_eq!(password.len(), TEMP_PASSWORD_LEN);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn temp_passwords_vary() {
        assert_ne!(generate_temp_password(), generate_temp_password());
    }
}
