use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Requests older than this relative to the server clock are rejected
/// outright, before any HMAC work (replay protection).
pub const SIGNATURE_FRESHNESS_SECS: i64 = 300;

/// Computes the Slack request signature for the given timestamp and raw
/// body: `v0=HMAC_SHA256(secret, "v0:{timestamp}:{body}")`.
pub fn sign_request(secret: &str, timestamp: i64, body: &str) -> String {
    let base = format!("v0:{}:{}", timestamp, body);
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .expect("HMAC-SHA256 accepts any key length");
    mac.update(base.as_bytes());
    format!("v0={:x}", mac.finalize().into_bytes())
}

/// Verifies a signature against the raw request body. `now` is the server
/// clock in epoch seconds; stale timestamps fail regardless of HMAC
/// correctness. Comparison is constant time.
pub fn verify_request(
    secret: &str,
    timestamp: i64,
    body: &str,
    signature: &str,
    now: i64,
) -> bool {
    if (now - timestamp).abs() > SIGNATURE_FRESHNESS_SECS {
        return false;
    }
    let expected = sign_request(secret, timestamp, body);
    subtle::ConstantTimeEq::ct_eq(expected.as_bytes(), signature.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "8f742231b10e8888abcd99yyyzzz85a5";
    const BODY: &str = "payload=%7B%22type%22%3A%22block_actions%22%7D";

    #[test]
    fn test_sign_request_format() {
        let signature = sign_request(SECRET, 1707379800, BODY);
        assert!(signature.starts_with("v0="), "signature should have v0= prefix");
        assert_eq!(signature.len(), 3 + 64, "signature should be prefix(3) + hex(64)");
    }

    #[test]
    fn test_sign_request_deterministic() {
        assert_eq!(
            sign_request(SECRET, 1707379800, BODY),
            sign_request(SECRET, 1707379800, BODY)
        );
    }

    #[test]
    fn test_verify_valid_signature() {
        let timestamp = 1707379800;
        let signature = sign_request(SECRET, timestamp, BODY);
        assert!(verify_request(SECRET, timestamp, BODY, &signature, timestamp));
    }

    #[test]
    fn test_verify_rejects_tampered_body() {
        let timestamp = 1707379800;
        let signature = sign_request(SECRET, timestamp, BODY);
        let mut tampered = BODY.to_string();
        tampered.push('x');
        assert!(!verify_request(SECRET, timestamp, &tampered, &signature, timestamp));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let timestamp = 1707379800;
        let signature = sign_request(SECRET, timestamp, BODY);
        assert!(!verify_request("other_secret", timestamp, BODY, &signature, timestamp));
    }

    #[test]
    fn test_verify_rejects_stale_timestamp() {
        let timestamp = 1707379800;
        let signature = sign_request(SECRET, timestamp, BODY);
        // Correct HMAC, but 301 seconds old.
        assert!(!verify_request(
            SECRET,
            timestamp,
            BODY,
            &signature,
            timestamp + SIGNATURE_FRESHNESS_SECS + 1
        ));
    }

    #[test]
    fn test_verify_accepts_at_freshness_boundary() {
        let timestamp = 1707379800;
        let signature = sign_request(SECRET, timestamp, BODY);
        assert!(verify_request(
            SECRET,
            timestamp,
            BODY,
            &signature,
            timestamp + SIGNATURE_FRESHNESS_SECS
        ));
    }

    #[test]
    fn test_verify_rejects_malformed_signature() {
        assert!(!verify_request(SECRET, 1707379800, BODY, "v0=nothex", 1707379800));
        assert!(!verify_request(SECRET, 1707379800, BODY, "", 1707379800));
    }
}
