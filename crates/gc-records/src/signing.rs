//! Illustrative message signing
//!
//! HMAC-SHA256 with a shared key. This is NOT a digital signature scheme:
//! anyone who can verify can also sign. It stands in for real key
//! management, which is out of scope for the ledger.

use crate::errors::RecordError;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn keyed_mac(key: &str) -> Result<HmacSha256, RecordError> {
    if key.is_empty() {
        return Err(RecordError::EmptyKey);
    }
    HmacSha256::new_from_slice(key.as_bytes()).map_err(|_| RecordError::EmptyKey)
}

/// Sign `message` with `key`, returning the tag as lowercase hex
pub fn sign_message(message: &str, key: &str) -> Result<String, RecordError> {
    let mut mac = keyed_mac(key)?;
    mac.update(message.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Check a hex tag produced by [`sign_message`]
///
/// The comparison runs in constant time. A tag that is not valid hex is an
/// error rather than a mismatch.
pub fn verify_signature(message: &str, signature: &str, key: &str) -> Result<bool, RecordError> {
    let tag = hex::decode(signature)?;
    let mut mac = keyed_mac(key)?;
    mac.update(message.as_bytes());
    Ok(mac.verify_slice(&tag).is_ok())
}
