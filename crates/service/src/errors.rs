use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// True for failures caused by the caller's input rather than storage.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServiceError::Validation(_) | ServiceError::Model(models::errors::ModelError::Validation(_))
        )
    }
}
