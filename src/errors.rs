use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum LodestarError {
    #[error("I/O error: {0}")]
    #[diagnostic(code(lodestar::io))]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    #[diagnostic(code(lodestar::config))]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(lodestar::serde))]
    Serde(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    #[diagnostic(code(lodestar::db))]
    Db(#[from] sea_orm::DbErr),

    #[error("{entity} not found for id {id}")]
    #[diagnostic(code(lodestar::not_found))]
    NotFound { entity: &'static str, id: String },

    #[error("{0}")]
    #[diagnostic(code(lodestar::other))]
    Other(String),
}

impl LodestarError {
    pub fn not_found(entity: &'static str, id: &str) -> Self {
        LodestarError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Lets callers distinguish "absent" from "unreachable".
    pub fn is_not_found(&self) -> bool {
        matches!(self, LodestarError::NotFound { .. })
    }
}
