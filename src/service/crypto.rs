use log::warn;
use sha3::{Digest, Sha3_256};
use uuid::Uuid;

pub const INVITATION_CODE_LEN: usize = 12;

pub fn get_sha3_256_hash(data: &[u8]) -> String {
    let mut hasher = Sha3_256::default();
    hasher.update(data);
    format!("{:X}", hasher.finalize())
}

/// One-way hash with a random per-record salt embedded in the output.
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, cost)
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or_else(|err| {
        warn!("stored password hash could not be checked: {}", err);
        false
    })
}

/// Random, upper-case hex code handed to guests of an event.
pub fn invitation_code() -> String {
    let seed = Uuid::new_v4();
    let mut code = get_sha3_256_hash(seed.as_bytes());
    code.truncate(INVITATION_CODE_LEN);
    code
}
