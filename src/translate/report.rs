//! Outcome reporting for lenient and batch translation.
//!
//! One bad line item fails only itself; one bad cart fails only itself. The
//! batch report keeps both levels apart so callers can tell a partially
//! converted batch from one where nothing converted at all.

use crate::error::TranslationError;
use serde::Serialize;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    /// Position of the failed item in the input cart.
    pub index: usize,
    pub error: TranslationError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartReport<T> {
    pub converted: Vec<T>,
    pub failures: Vec<ItemFailure>,
}

impl<T> CartReport<T> {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// True when the cart had items and none of them converted.
    pub fn all_failed(&self) -> bool {
        self.converted.is_empty() && !self.failures.is_empty()
    }
}

pub(crate) fn collect<I, T>(
    items: &[I],
    mut convert: impl FnMut(&I) -> Result<T, TranslationError>,
) -> CartReport<T> {
    let mut converted = Vec::with_capacity(items.len());
    let mut failures = Vec::new();
    for (index, item) in items.iter().enumerate() {
        match convert(item) {
            Ok(value) => converted.push(value),
            Err(error) => {
                warn!(index, %error, "line item failed to translate");
                failures.push(ItemFailure { index, error });
            }
        }
    }
    CartReport {
        converted,
        failures,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CartOutcome<T> {
    Converted { report: CartReport<T> },
    Aborted { error: TranslationError },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport<T> {
    pub carts: Vec<CartOutcome<T>>,
}

impl<T> BatchReport<T> {
    pub fn is_clean(&self) -> bool {
        self.carts.iter().all(|outcome| match outcome {
            CartOutcome::Converted { report } => report.is_clean(),
            CartOutcome::Aborted { .. } => false,
        })
    }

    /// True when the batch was non-empty and no cart produced any item.
    pub fn all_failed(&self) -> bool {
        !self.carts.is_empty()
            && self.carts.iter().all(|outcome| match outcome {
                CartOutcome::Converted { report } => report.all_failed(),
                CartOutcome::Aborted { .. } => true,
            })
    }

    pub fn failed_items(&self) -> usize {
        self.carts
            .iter()
            .map(|outcome| match outcome {
                CartOutcome::Converted { report } => report.failures.len(),
                CartOutcome::Aborted { .. } => 0,
            })
            .sum()
    }

    pub fn aborted_carts(&self) -> usize {
        self.carts
            .iter()
            .filter(|outcome| matches!(outcome, CartOutcome::Aborted { .. }))
            .count()
    }
}

/// Convert every cart, isolating each one. A panic inside `convert` is caught
/// here, once, and recorded as an aborted cart.
pub fn run_batch<C, T>(carts: &[C], convert: impl Fn(&C) -> CartReport<T>) -> BatchReport<T> {
    let mut outcomes = Vec::with_capacity(carts.len());
    for (index, cart) in carts.iter().enumerate() {
        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| convert(cart))) {
            Ok(report) => CartOutcome::Converted { report },
            Err(payload) => {
                let detail = panic_detail(&*payload);
                warn!(cart = index, %detail, "cart translation aborted");
                CartOutcome::Aborted {
                    error: TranslationError::Internal { detail },
                }
            }
        };
        outcomes.push(outcome);
    }
    BatchReport { carts: outcomes }
}

fn panic_detail(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    "unknown panic".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fail(name: &str) -> TranslationError {
        TranslationError::UnknownGenericName {
            name: name.to_string(),
        }
    }

    #[test]
    fn collect_keeps_siblings_of_failed_items() {
        let report = collect(&[1, 2, 3], |n| if *n == 2 { Err(fail("two")) } else { Ok(n * 10) });
        assert_eq!(report.converted, vec![10, 30]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 1);
        assert!(!report.all_failed());
    }

    #[test]
    fn batch_distinguishes_partial_from_total_failure() {
        let partial = run_batch(&[vec![1, 2], vec![3]], |cart| {
            collect(cart, |n| if *n == 1 { Err(fail("one")) } else { Ok(*n) })
        });
        assert!(!partial.is_clean());
        assert!(!partial.all_failed());
        assert_eq!(partial.failed_items(), 1);

        let total = run_batch(&[vec![1], vec![1, 1]], |cart| {
            collect(cart, |_: &i32| -> Result<i32, _> { Err(fail("one")) })
        });
        assert!(total.all_failed());
        assert_eq!(total.failed_items(), 3);
    }

    #[test]
    fn panics_abort_only_their_cart() {
        let report = run_batch(&[0, 1, 2], |cart| {
            if *cart == 1 {
                panic!("boom");
            }
            collect(&[*cart], |n| Ok(*n))
        });
        assert_eq!(report.aborted_carts(), 1);
        assert!(!report.all_failed());
        assert!(matches!(
            &report.carts[1],
            CartOutcome::Aborted { error: TranslationError::Internal { detail } } if detail == "boom"
        ));
    }
}
