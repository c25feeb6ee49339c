use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Validation(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Received an empty response from the AI model.")]
    EmptyResponse,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("OpenAI error: {0}")]
    OpenAi(#[from] async_openai::error::OpenAIError),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// The underlying failure text, without the variant's display prefix.
    ///
    /// Used when an error is folded into a user-facing message that carries
    /// its own prefix.
    pub fn detail(&self) -> String {
        match self {
            Self::Config(s)
            | Self::Validation(s)
            | Self::Llm(s)
            | Self::MalformedResponse(s) => s.clone(),
            Self::EmptyResponse => self.to_string(),
            Self::Serialization(e) => e.to_string(),
            Self::Yaml(e) => e.to_string(),
            Self::Io(e) => e.to_string(),
            Self::Network(e) => e.to_string(),
            Self::AddrParse(e) => e.to_string(),
            Self::OpenAi(e) => e.to_string(),
        }
    }
}
