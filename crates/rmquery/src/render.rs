//! The shared rendering capability.

use std::fmt;

/// Anything that compiles to filter dialect text.
///
/// Implemented by [`Predicate`](crate::Predicate),
/// [`PredicateGroup`](crate::PredicateGroup), every expression type and
/// the [`Query`](crate::Query) union. Rendering is a pure function of an
/// already-validated value; calling it twice yields identical text.
pub trait Render: fmt::Display {
    /// Renders the dialect text.
    fn render(&self) -> String {
        self.to_string()
    }
}
