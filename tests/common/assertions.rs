//! Logged assertion helpers for blockbar tests.
//!
//! These functions wrap standard assertions with tracing logs,
//! providing detailed context when assertions fail.

#![allow(dead_code)]

use std::fmt::Debug;

/// Assert equality with detailed logging.
#[track_caller]
pub fn assert_eq_logged<T: PartialEq + Debug>(context: &str, actual: T, expected: T) {
    tracing::debug!(
        context = context,
        expected = ?expected,
        actual = ?actual,
        "asserting equality"
    );

    if actual != expected {
        tracing::error!(
            context = context,
            expected = ?expected,
            actual = ?actual,
            "assertion failed: values not equal"
        );
    }

    assert_eq!(
        actual, expected,
        "{context}: expected {expected:?}, got {actual:?}"
    );

    tracing::trace!(context = context, "assertion passed");
}

/// Assert that a value is true with logging.
#[track_caller]
pub fn assert_true_logged(context: &str, value: bool) {
    tracing::debug!(context = context, value = value, "asserting true");

    if !value {
        tracing::error!(context = context, "assertion failed: expected true");
    }

    assert!(value, "{context}: expected true, got false");
}

/// Assert that a Result is Ok and return the value.
#[track_caller]
pub fn assert_ok_logged<T: Debug, E: Debug>(context: &str, result: Result<T, E>) -> T {
    match result {
        Ok(value) => {
            tracing::debug!(context = context, value = ?value, "result is Ok");
            value
        }
        Err(err) => {
            tracing::error!(context = context, error = ?err, "assertion failed: expected Ok");
            panic!("{context}: expected Ok, got Err({err:?})");
        }
    }
}

/// Assert that a Result is Err and return the error.
#[track_caller]
pub fn assert_err_logged<T: Debug, E: Debug>(context: &str, result: Result<T, E>) -> E {
    match result {
        Ok(value) => {
            tracing::error!(context = context, value = ?value, "assertion failed: expected Err");
            panic!("{context}: expected Err, got Ok({value:?})");
        }
        Err(err) => {
            tracing::debug!(context = context, error = ?err, "result is Err");
            err
        }
    }
}

/// Assert that a string does not contain a substring.
#[track_caller]
pub fn assert_not_contains_logged(context: &str, haystack: &str, needle: &str) {
    let contains = haystack.contains(needle);
    tracing::debug!(
        context = context,
        needle = needle,
        contains = contains,
        "asserting substring absent"
    );

    assert!(
        !contains,
        "{context}: expected {haystack:?} not to contain {needle:?}"
    );
}

/// Assert a collection has the expected length.
#[track_caller]
pub fn assert_len_logged<T>(context: &str, slice: &[T], expected_len: usize) {
    let actual_len = slice.len();
    tracing::debug!(
        context = context,
        expected = expected_len,
        actual = actual_len,
        "asserting length"
    );

    assert_eq!(
        actual_len, expected_len,
        "{context}: expected length {expected_len}, got {actual_len}"
    );
}
