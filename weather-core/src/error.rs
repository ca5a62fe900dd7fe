use thiserror::Error;

/// Why a single weather fetch failed.
///
/// The `Display` text is what observers end up seeing in `RequestState::Error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Network, DNS, timeout, or a body that could not be decoded.
    #[error("Failed to load data: {0}")]
    Transport(String),

    /// Provider answered with a non-success status.
    #[error("Failed to load data: {message}")]
    HttpStatus { status: u16, message: String },

    /// Request succeeded but carried no payload.
    #[error("No data received")]
    EmptyBody,
}
