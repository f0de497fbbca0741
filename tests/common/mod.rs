//! Shared test utilities for geodecode integration tests.
//!
//! Byte-level file builders live in [`builders`]; the helpers here wrap the
//! readers and summarize notifications so test crates import them via
//! `mod common;`.

#![allow(dead_code)]

pub mod builders;

use geodecode::{NotificationCollection, NotificationType};

/// Messages of every notification of the given type.
pub fn messages(notifications: &NotificationCollection, kind: NotificationType) -> Vec<String> {
    notifications
        .of_type(kind)
        .into_iter()
        .map(|n| n.message.clone())
        .collect()
}

/// Assert that no warning was raised, printing them otherwise.
pub fn assert_no_warnings(notifications: &NotificationCollection) {
    let warnings = messages(notifications, NotificationType::Warning);
    assert!(warnings.is_empty(), "unexpected warnings: {:#?}", warnings);
}

/// Approximate float comparison for decoded coordinates.
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
