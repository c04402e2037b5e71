/// Actor driving scheduler ticks:
pub mod renewal_executor;

/// Actor delivering orchestrator events:
pub mod notificator;
