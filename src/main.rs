//! Certmole server

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
// For development:
// #![allow(dead_code, unused_imports, unused_variables, deprecated)]


use actix::prelude::*;
use certmole::{
    actors::{
        notificator::Notificator,
        renewal_executor::{RenewalExecutor, TickNow},
    },
    *,
};
use std::time::Instant;
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};


/// Initial setup of the tracing subscriber, returning the filter reload handle
fn setup_logger() -> reload::Handle<EnvFilter, Registry> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Config::load().get_log_level()));
    let (filter_layer, handle) = reload::Layer::new(filter);
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt::layer())
        .init();
    handle
}


/// Set log level dynamically at runtime
fn set_log_level(handle: &reload::Handle<EnvFilter, Registry>) {
    let level = Config::load().get_log_level();
    if let Err(err) = handle.reload(EnvFilter::new(&level)) {
        eprintln!("Failed to change log level to: {level}, cause: {err}");
    }
}


#[actix_macros::main]
async fn main() {
    let log_handle = setup_logger();
    ctrlc::set_handler(|| {
        println!("\n\nCertmole server was interrupted!");
        std::process::exit(0);
    })
    .expect("Couldn't initialize Ctrl-C handler");

    info!("Starting Certmole-server v{}", env!("CARGO_PKG_VERSION"));

    // Define system actors
    let num = 1;
    let renewal_executor = SyncArbiter::start(num, || RenewalExecutor);
    let notificator = SyncArbiter::start(num, || Notificator);

    loop {
        set_log_level(&log_handle);
        debug!("New scheduler iteration…");

        let started = Instant::now();
        let outcome = renewal_executor
            .send(TickNow(notificator.clone()))
            .await
            .unwrap_or_else(|err| {
                TickOutcome::Skipped(format!("Executor mailbox error: {err}"))
            });

        match &outcome {
            TickOutcome::Completed(report) => {
                info!(
                    "Scheduler tick took: {}s. {}",
                    started.elapsed().as_secs(),
                    report.to_string()
                );
            }
            TickOutcome::Skipped(reason) => {
                warn!("Scheduler tick skipped. Reason: {reason}");
            }
        }

        wait_until_due(&Store::from_config(), started);
    }
}
