#![doc(test(attr(deny(warnings))))]

//! OSK Manager: course, reservation and instructor schedule management for a
//! driving school, with a scriptable shell on top.

pub mod cli;
pub mod core;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing with the default filter.
pub fn init() {
    init_with_filter(utils::DEFAULT_LOG_FILTER);
}

/// Initializes global tracing with `directives` unless `RUST_LOG` is set.
pub fn init_with_filter(directives: &str) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(directives);
        tracing::info!("OSK Manager tracing initialized.");
    });
}
