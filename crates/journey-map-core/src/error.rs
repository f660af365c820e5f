pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid journey document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid graph config YAML: {message}")]
    InvalidConfigYaml { message: String },
}
