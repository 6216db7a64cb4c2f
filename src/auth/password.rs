use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};

/// Checks `password` against a stored PHC-format argon2 hash.
pub fn verify_password(password: &str, hashed: &str) -> Result<(), argon2::password_hash::Error> {
    let argon2 = Argon2::default();
    let parsed = PasswordHash::new(hashed)?;

    argon2.verify_password(password.as_bytes(), &parsed)
}

#[cfg(test)]
pub fn hash_password(password: &str) -> String {
    use argon2::password_hash::{PasswordHasher, SaltString, rand_core::OsRng};

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .unwrap()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_matching_password() {
        let hashed = hash_password("rahasia123");
        assert!(verify_password("rahasia123", &hashed).is_ok());
        assert!(verify_password("salah", &hashed).is_err());
    }

    #[test]
    fn malformed_hash_is_an_error_not_a_panic() {
        assert!(verify_password("x", "not-a-hash").is_err());
    }
}
