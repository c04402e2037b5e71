/// In-memory set of domains currently mid-operation:
pub mod processing;

/// External certificate tool driver:
pub mod certtool;

/// Serialized, retried access to the external tool:
pub mod coordinator;
