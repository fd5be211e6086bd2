use crate::error::ApiError;

/// Validate a chat prompt before any provider is called. Only a missing or
/// empty prompt is rejected; size is bounded by the request body limit.
pub fn validate_chat_request(message: Option<&str>) -> Result<&str, ApiError> {
    match message {
        Some(message) if !message.is_empty() => Ok(message),
        _ => Err(ApiError::InvalidInput("Please send a message.".to_string())),
    }
}
