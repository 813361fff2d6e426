use crate::domain::{PaymentPlan, PlanQuote};

/// Custom actions for Course entities.
#[derive(Debug, Clone)]
pub enum CourseAction {
    /// Prices the course under the given plan without modifying it.
    Quote(PaymentPlan),
}

/// Results from CourseActions - variants match 1:1 with CourseAction
#[derive(Debug, Clone)]
pub enum CourseActionResult {
    Quote(PlanQuote),
}
