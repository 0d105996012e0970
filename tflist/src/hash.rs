//! Deterministic result identifiers
//!
//! A listing data source has no natural id, so its id is derived from the
//! ordered ids it matched. The derivation is the CRC-32 (IEEE) checksum of
//! every id followed by `-`, rendered in decimal, which keeps ids stable
//! across provider versions for state already written by Terraform.
//!
//! The hash is order-sensitive: the same ids returned in a different order
//! produce a different identifier.

/// CRC-32 (IEEE) of `s` as a decimal string
pub fn hashcode_string(s: &str) -> String {
    crc32fast::hash(s.as_bytes()).to_string()
}

/// Identifier for a result set with the given ordered ids
pub fn result_id_hash<I, S>(ids: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut hasher = crc32fast::Hasher::new();
    for id in ids {
        hasher.update(id.as_ref().as_bytes());
        hasher.update(b"-");
    }
    hasher.finalize().to_string()
}
