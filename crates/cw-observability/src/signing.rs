//! HMAC-SHA256 signing of audit records.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Field holding the signature in a locally written record.
pub const SIGNATURE_FIELD: &str = "_signature";

/// Header carrying the signature when a record is forwarded.
pub const SIGNATURE_HEADER: &str = "X-Audit-Signature";

/// Returns the hex-encoded HMAC-SHA256 of `payload` under `key`.
pub fn sign_payload(key: &[u8], payload: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Checks a hex signature over `payload` in constant time.
pub fn verify_signature(payload: &str, signature: &str, key: &[u8]) -> bool {
    let expected = match hex::decode(signature) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    let mut mac = match HmacSha256::new_from_slice(key) {
        Ok(m) => m,
        Err(_) => return false,
    };
    mac.update(payload.as_bytes());
    mac.verify_slice(&expected).is_ok()
}

/// Verifies one line of a signed audit log.
///
/// The record minus its signature field is re-serialized into the same
/// canonical form the logger signed (object keys in sorted order).
pub fn verify_record(line: &str, key: &[u8]) -> bool {
    let mut value: serde_json::Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(_) => return false,
    };

    let signature = match value
        .as_object_mut()
        .and_then(|obj| obj.remove(SIGNATURE_FIELD))
    {
        Some(serde_json::Value::String(sig)) => sig,
        _ => return false,
    };

    match serde_json::to_string(&value) {
        Ok(unsigned) => verify_signature(&unsigned, &signature, key),
        Err(_) => false,
    }
}
