//! Guard predicates over the shared context.
//!
//! Guards are boolean checks evaluated fresh on every evaluation call. They
//! read the caller's context but never mutate it.

use std::fmt;
use std::sync::Arc;

/// Predicate over the shared context that gates a transition.
///
/// # Example
///
/// ```rust
/// use tickstate::core::Guard;
///
/// struct Robot {
///     should_intake: bool,
/// }
///
/// let wants_intake = Guard::new(|robot: &Robot| robot.should_intake);
///
/// assert!(wants_intake.check(&Robot { should_intake: true }));
/// assert!(!wants_intake.check(&Robot { should_intake: false }));
/// ```
pub struct Guard<C> {
    predicate: Arc<dyn Fn(&C) -> bool + Send + Sync>,
    label: Option<String>,
}

impl<C> Guard<C> {
    /// Create a guard from a predicate function.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
            label: None,
        }
    }

    /// Create a guard carrying a label used in transition descriptions.
    ///
    /// ```rust
    /// use tickstate::core::Guard;
    ///
    /// let guard = Guard::labeled("battery ok", |volts: &f64| *volts > 11.5);
    /// assert_eq!(guard.label(), Some("battery ok"));
    /// ```
    pub fn labeled<F>(label: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
            label: Some(label.into()),
        }
    }

    /// Evaluate the predicate against the context.
    pub fn check(&self, context: &C) -> bool {
        (self.predicate)(context)
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl<C> Clone for Guard<C> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
            label: self.label.clone(),
        }
    }
}

impl<C> fmt::Debug for Guard<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").field("label", &self.label).finish()
    }
}
