use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid parameter: {reason}")]
    InvalidParameter { reason: String },

    #[error("Plan not found: {plan_id}")]
    PlanNotFound { plan_id: String },

    #[error("Infrastructure error: {0}")]
    InfrastructureError(String),
}

impl DomainError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        DomainError::InvalidParameter {
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("No path generated: the surface is fully obstructed")]
    NoPathGenerated,

    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    #[error("Stream fault: {0}")]
    StreamFault(String),

    #[error("Path generation aborted: {0}")]
    GenerationFault(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
