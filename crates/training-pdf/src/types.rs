use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Plan(#[from] training_plan::SessionError),
}

pub type Result<T> = std::result::Result<T, ExportError>;
