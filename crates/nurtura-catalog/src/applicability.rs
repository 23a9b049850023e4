//! Age-window applicability.
//!
//! Every other component consults this filter; it must stay pure and
//! deterministic for a given (age, catalog) pair. Widening a question's
//! window never removes it from applicability at a fixed age.

use crate::catalog::Question;

/// A question applies to a child iff the child's age in whole months falls
/// inside the question's inclusive `[min_age_months, max_age_months]` window.
pub fn applicable(question: &Question, age_months: i32) -> bool {
    age_months >= question.min_age_months && age_months <= question.max_age_months
}
