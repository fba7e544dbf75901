/*!
 * Error types for the cuedub application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when parsing a single timestamp
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    /// The timestamp does not have two or three colon-separated fields
    #[error("Invalid timestamp '{value}': expected HH:MM:SS.mmm or MM:SS.mmm, found {fields} field(s)")]
    FieldCount {
        /// Raw timestamp text
        value: String,
        /// Number of fields found
        fields: usize,
    },

    /// A field is not a finite number
    #[error("Invalid timestamp '{value}': field '{field}' is not a number")]
    InvalidField {
        /// Raw timestamp text
        value: String,
        /// Offending field
        field: String,
    },

    /// The weighted sum is negative or not finite
    #[error("Invalid timestamp '{value}': {seconds} is not a valid offset")]
    OutOfRange {
        /// Raw timestamp text
        value: String,
        /// Computed offset in seconds
        seconds: f64,
    },
}

/// Errors that can occur while parsing a cue track
#[derive(Error, Debug)]
pub enum CueParseError {
    /// A timing line contains an unparsable timestamp
    #[error("Malformed timing line {line}: {source}")]
    Format {
        /// 1-based line number of the timing line
        line: usize,
        /// Underlying timestamp error
        #[source]
        source: FormatError,
    },

    /// The track file could not be read
    #[error("Failed to read cue track: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The provider answered with nothing usable
    #[error("Empty translation for '{0}'")]
    Empty(String),
}

/// Errors reported by a speech engine for one utterance
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpeechError {
    /// The utterance was cancelled before it finished
    #[error("Utterance cancelled")]
    Cancelled,

    /// The engine failed to synthesize the utterance
    #[error("Synthesis failed: {0}")]
    Synthesis(String),

    /// The engine went away without reporting an outcome
    #[error("Speech engine dropped the utterance")]
    Interrupted,
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}
