#![doc(test(attr(deny(warnings))))]

//! Quote Wizard drives a multi-step quote request: a typed form record, step
//! navigation with per-step validation, honeypot and arithmetic anti-spam
//! checks, and a submission lifecycle around an external form backend.

pub mod antispam;
pub mod cli;
pub mod config;
pub mod errors;
pub mod form;
pub mod submission;
pub mod utils;
pub mod wizard;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Quote Wizard tracing initialized.");
    });
}
