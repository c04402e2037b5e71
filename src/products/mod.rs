/// Renewal failure taxonomy and skip reasons:
pub mod failure;

/// Per-cycle summary report:
pub mod report;

/// Append-only activity log entries:
pub mod activity;
