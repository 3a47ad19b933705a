//! Thin, typed wrappers over the three external services the live tools
//! use: kubectl (subprocess), Prometheus HTTP API v1, Grafana HTTP API.
//! Every call carries an explicit timeout and truncates subprocess output
//! at 512 KiB.

pub mod grafana;
pub mod kubectl;
pub mod prometheus;

pub const SUBPROCESS_TRUNCATE_BYTES: usize = 512 * 1024;
pub const HTTP_TIMEOUT_SECS: u64 = 15;
pub const KUBECTL_READ_TIMEOUT_SECS: u64 = 30;
pub const KUBECTL_APPLY_TIMEOUT_SECS: u64 = 30;
pub const CONNECTIVITY_TIMEOUT_SECS: u64 = 10;

pub fn truncate(s: String) -> String {
    if s.len() <= SUBPROCESS_TRUNCATE_BYTES {
        s
    } else {
        let mut out = s;
        out.truncate(SUBPROCESS_TRUNCATE_BYTES);
        out.push_str("\n... [truncated at 512 KiB]");
        out
    }
}
