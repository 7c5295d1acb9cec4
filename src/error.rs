use thiserror::Error;

// Enum for handling application-level errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("AI error: {0}")]
    AI(#[from] AIError), // Errors related to AI operations.

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error), // Errors related to settings serialization.

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error), // Input/output errors.

    #[error("Could not locate the home directory")]
    NoHomeDirectory,

    #[error("Logger error: {0}")]
    Logger(#[from] log::SetLoggerError),
}

// Errors raised by the narrative and image generators. The Display text is what players see.
#[derive(Debug, Error)]
pub enum AIError {
    #[error("OpenAI API error: {0}")]
    OpenAI(#[from] async_openai::error::OpenAIError), // Errors from the OpenAI API.

    #[error("OpenAI API key not found. Set OPENAI_API_KEY or add openai_api_key to settings.json.")]
    MissingApiKey,

    #[error("Timeout occurred")]
    Timeout, // Error when an AI operation exceeds its time limit.

    #[error("The story generator returned no text")]
    NoContent,

    #[error("Image generation returned no images or image data was missing.")]
    NoImage,

    #[error("{0}")]
    Service(String), // Free-form failure reported by a generator.
}

impl From<tokio::time::error::Elapsed> for AIError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        AIError::Timeout
    }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
