//! Password hashing
//!
//! Salted SHA-256, lặp nhiều vòng. Salt 16 byte ngẫu nhiên, lưu dạng hex
//! cạnh hash trong bảng `credentials`.

use rand::RngCore;
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 16;
const HASH_ROUNDS: u32 = 10_000;

/// Sinh salt ngẫu nhiên (hex)
pub fn generate_salt() -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    hex::encode(salt)
}

/// Hash password với salt, trả về hex digest
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    let mut digest = hasher.finalize();

    for _ in 1..HASH_ROUNDS {
        let mut hasher = Sha256::new();
        hasher.update(digest);
        hasher.update(salt.as_bytes());
        digest = hasher.finalize();
    }

    hex::encode(digest)
}

/// Kiểm tra password so với hash đã lưu (constant-time compare)
pub fn verify_password(password: &str, salt: &str, expected_hash: &str) -> bool {
    let actual = hash_password(password, salt);
    constant_time_eq(actual.as_bytes(), expected_hash.as_bytes())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let salt = generate_salt();
        assert_eq!(salt.len(), SALT_LEN * 2);

        let hash = hash_password("correct horse", &salt);
        assert_eq!(hash.len(), 64);
        assert!(verify_password("correct horse", &salt, &hash));
        assert!(!verify_password("wrong horse", &salt, &hash));
    }

    #[test]
    fn test_salt_changes_hash() {
        let a = hash_password("password1", "00ff");
        let b = hash_password("password1", "ff00");
        assert_ne!(a, b);
        assert_eq!(a, hash_password("password1", "00ff"));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
    }
}
