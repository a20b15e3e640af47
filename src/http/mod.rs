//! HTTP protocol layer module
//!
//! Request decoding and response building, kept apart from the book handlers.

pub mod form;
pub mod response;

// Re-export commonly used types
pub use form::FormValues;
pub use response::{health_response, json_response, message_response, method_not_allowed};
