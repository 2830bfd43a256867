//! Assertions used by scenarios.
//!
//! A failed assertion is an ordinary [`E2eError::AssertionFailed`], so
//! scenario bodies chain them with `?` and the runner records the message.

use crate::result::{E2eError, E2eResult};
use std::fmt::Debug;

/// Assertion helpers for scenarios
#[derive(Debug, Clone, Copy)]
pub struct Assertion;

impl Assertion {
    /// Assert two values are equal
    pub fn equals<E, A>(what: &str, expected: &E, actual: &A) -> E2eResult<()>
    where
        E: Debug + ?Sized,
        A: PartialEq<E> + Debug + ?Sized,
    {
        if actual == expected {
            Ok(())
        } else {
            Err(E2eError::assertion(format!(
                "{what}: expected {expected:?}, got {actual:?}"
            )))
        }
    }

    /// Assert a string contains a substring
    pub fn contains(what: &str, haystack: &str, needle: &str) -> E2eResult<()> {
        if haystack.contains(needle) {
            Ok(())
        } else {
            Err(E2eError::assertion(format!(
                "{what}: expected '{haystack}' to contain '{needle}'"
            )))
        }
    }

    /// Assert a condition is true
    pub fn is_true(condition: bool, message: &str) -> E2eResult<()> {
        if condition {
            Ok(())
        } else {
            Err(E2eError::assertion(message))
        }
    }

    /// Assert a condition is false
    pub fn is_false(condition: bool, message: &str) -> E2eResult<()> {
        Self::is_true(!condition, message)
    }

    /// Assert a collection has the expected length
    pub fn has_length<T>(what: &str, collection: &[T], expected: usize) -> E2eResult<()> {
        if collection.len() == expected {
            Ok(())
        } else {
            Err(E2eError::assertion(format!(
                "{what}: expected length {expected}, got {}",
                collection.len()
            )))
        }
    }

    /// Assert an operation failed with an error matching `predicate`
    pub fn fails_with<T: Debug>(
        what: &str,
        result: E2eResult<T>,
        predicate: impl FnOnce(&E2eError) -> bool,
    ) -> E2eResult<()> {
        match result {
            Err(err) if predicate(&err) => Ok(()),
            Err(err) => Err(E2eError::assertion(format!("{what}: unexpected error {err}"))),
            Ok(value) => Err(E2eError::assertion(format!(
                "{what}: expected an error, got {value:?}"
            ))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod equality_tests {
        use super::*;

        #[test]
        fn test_equals() {
            assert!(Assertion::equals("value", "a", "a").is_ok());
            let err = Assertion::equals("value", &1_u32, &2_u32).unwrap_err();
            assert_eq!(err.to_string(), "Assertion failed: value: expected 1, got 2");
        }

        #[test]
        fn test_contains() {
            assert!(Assertion::contains("body", "Something went wrong", "wrong").is_ok());
            assert!(matches!(
                Assertion::contains("body", "", "wrong"),
                Err(E2eError::AssertionFailed { .. })
            ));
        }
    }

    mod condition_tests {
        use super::*;

        #[test]
        fn test_is_true_and_false() {
            assert!(Assertion::is_true(true, "never").is_ok());
            assert!(Assertion::is_false(true, "expanded").is_err());
            assert!(Assertion::has_length("rows", &[1, 2], 2).is_ok());
            assert!(Assertion::has_length("rows", &[1], 2).is_err());
        }

        #[test]
        fn test_fails_with() {
            let missing: E2eResult<()> = Err(E2eError::MissingWrapper {
                page: "Dialog".to_string(),
            });
            assert!(Assertion::fails_with("bind", missing, |e| matches!(
                e,
                E2eError::MissingWrapper { .. }
            ))
            .is_ok());
            assert!(Assertion::fails_with("bind", Ok(1), |_| true).is_err());
        }
    }
}
