use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("trial budget of {budget} exhausted")]
    BudgetExhausted { budget: usize },
}
