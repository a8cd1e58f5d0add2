use rand::{RngCore, rngs::OsRng};
use subtle::ConstantTimeEq;

const PASSWORD_BYTES: usize = 4;
const ACCESS_TOKEN_BYTES: usize = 16;

/// Eight uppercase hex characters, shown to the buyer and typed into the room gate.
pub fn generate_room_password() -> String {
    let mut bytes = [0u8; PASSWORD_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode_upper(bytes)
}

/// Thirty-two lowercase hex characters, used in shareable access links.
pub fn generate_access_token() -> String {
    let mut bytes = [0u8; ACCESS_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn secrets_match(expected: &str, candidate: &str) -> bool {
    expected.as_bytes().ct_eq(candidate.as_bytes()).into()
}
