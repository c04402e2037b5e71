//! Certificate renewal orchestrator

//! Crate docs

#![forbid(unsafe_code)]
#![deny(
    unstable_features,
    missing_docs,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    bad_style,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused_allocation,
    unused_comparisons,
    unused_parens,
    while_true
)]
#![warn(dead_code, unused_imports, unused_variables)]

// For development:
// #![allow(dead_code, unused_imports, unused_variables, deprecated)]


/// Use MiMalloc as default allocator:
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;


// Load all useful macros:

#[macro_use]
pub extern crate serde_derive;


pub use crate::actors::notificator::*;
pub use crate::actors::renewal_executor::*;
pub use crate::config::*;
pub use crate::configuration::*;
pub use crate::cycle::*;
pub use crate::events::*;
pub use crate::products::activity::*;
pub use crate::products::failure::*;
pub use crate::products::report::*;
pub use crate::scheduler::*;
pub use crate::states::domain::*;
pub use crate::states::policy::*;
pub use crate::states::status::*;
pub use crate::store::*;
pub use crate::utilities::*;
pub use tracing::{debug, error, info, instrument, trace, warn};


//
// Public modules:
//

/// Configuration defaults:
pub mod configuration;

/// Dynamic config:
pub mod config;

/// Utilities and helpers:
pub mod utilities;

/// Persisted and probed state types:
pub mod states;

/// Renewal products: failures, reports, activity entries:
pub mod products;

/// Orchestrator events and sinks:
pub mod events;

/// Certificate status probing and caching:
pub mod probes;

/// External tool driver, processing set and coordinator:
pub mod tool;

/// Renewal eligibility evaluation:
pub mod eligibility;

/// Batch renewal executor:
pub mod cycle;

/// Scheduler tick and run lock:
pub mod scheduler;

/// Durable policy, state and activity store:
pub mod store;

/// External input collaborators:
pub mod inputs;

/// Settings API functions:
pub mod api;

/// Actors:
pub mod actors;

//
// Private modules:
//

/// Tests:
mod tests;
