use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest_middleware::Error),

    #[error("Failed to read response: {0}")]
    Body(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Sheets API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Invalid credentials: {0}")]
    Credentials(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("Spreadsheet has no worksheets")]
    NoWorksheet,
}

pub type Result<T> = std::result::Result<T, SheetsError>;
