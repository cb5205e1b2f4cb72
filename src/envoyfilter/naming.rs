//! Deterministic names for generated patches and the listeners they target.
//!
//! Names are the identity of a patch downstream (create-or-update), so the
//! same inputs must always produce the same string.

/// Prefix shared by every generated patch name.
pub const PATCH_NAME_PREFIX: &str = "aeraki";

/// `aeraki-outbound-{host}-{address}-{port}`
pub fn outbound_patch_name(host: &str, address: &str, port: u32) -> String {
    format!("{}-outbound-{}-{}-{}", PATCH_NAME_PREFIX, host, address, port)
}

/// `aeraki-inbound-{host}-{port}`
pub fn inbound_patch_name(host: &str, port: u32) -> String {
    format!("{}-inbound-{}-{}", PATCH_NAME_PREFIX, host, port)
}

/// Name of the per-address outbound listener, `{address}_{port}`.
pub fn outbound_listener_name(address: &str, port: u32) -> String {
    format!("{}_{}", address, port)
}
