/// Per-domain renewal state:
pub mod domain;

/// Global renewal policy singleton:
pub mod policy;

/// Probed TLS certificate status:
pub mod status;
