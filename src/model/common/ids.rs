use data_encoding::HEXLOWER;
use sha2::{Digest, Sha256};

/// Generate a fresh random identifier: 24 lowercase hex characters.
pub fn new_id() -> String {
    HEXLOWER.encode(&rand::random::<[u8; 12]>())
}

/// The identifier of the cached ballot for a ZIP code within an election event.
/// The same pair always yields the same identifier.
pub fn ballot_id(zipcode: &str, event_id: &str) -> String {
    let digest = Sha256::new()
        .chain_update(zipcode.as_bytes())
        .chain_update(b":")
        .chain_update(event_id.as_bytes())
        .finalize();
    HEXLOWER.encode(&digest[..16])
}
