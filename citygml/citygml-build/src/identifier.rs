//! Stable identifier generation.
//!
//! Identifiers are either derived deterministically from source identifiers
//! and a role tag, or freshly minted v4 UUIDs when random geometry ids are
//! requested.

use uuid::Uuid;

/// Derive a deterministic, GML-safe identifier from a source id and a role.
///
/// The result is stable within and across runs for the same input.
///
/// # Example
///
/// ```
/// use citygml_build::derive_id;
///
/// assert_eq!(derive_id("1/0/-1", "TrafficSpace"), "TrafficSpace_1_0_-1");
/// ```
#[must_use]
pub fn derive_id(source: &str, role: &str) -> String {
    let sanitized: String = source
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{role}_{sanitized}")
}

/// Mint a random v4 UUID identifier with a GML-safe prefix.
#[must_use]
pub fn generate_random_uuid() -> String {
    format!("UUID_{}", Uuid::new_v4())
}

/// Choose a geometry identifier per configuration: random when requested,
/// derived otherwise.
#[must_use]
pub fn geometry_id(source: &str, role: &str, random: bool) -> String {
    if random {
        generate_random_uuid()
    } else {
        derive_id(source, role)
    }
}
