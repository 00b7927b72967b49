//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid option '{input}': expected a number between {min} and {max}")]
    InvalidOption {
        input: String,
        min: usize,
        max: usize,
    },

    #[error("No input left for prompt: {label}")]
    PromptExhausted { label: String },

    #[error("Invalid settings: {message}")]
    InvalidSettings { message: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;
