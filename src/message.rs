// src/message.rs
use serde::{Deserialize, Serialize};

/// A chat request that passed validation.
#[derive(Debug, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
    pub age: u8,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
