// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const AUTH_ATTEMPT: &str = "auth.attempt";
pub const AUTH_SUCCESS: &str = "auth.success";
pub const AUTH_NO_MATCH: &str = "auth.no_match";
pub const STORE_RECONNECT: &str = "store.reconnect";
