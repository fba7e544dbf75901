/*!
 * Translation provider implementations.
 *
 * This module contains the clients the orchestrator can translate cues with:
 * - Google: the public `translate_a/single` endpoint
 * - Mock: scripted behaviors for tests and dry runs
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::{ProviderError, TranslationError};

/// Common trait for all translation providers
///
/// Implementations are shared between the orchestrator and the tasks it
/// spawns for in-flight requests, hence `Send + Sync`.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Translate `text` from `source_language` to `target_language`
    ///
    /// # Returns
    /// * `Result<String, TranslationError>` - The translated text or an error
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslationError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}

/// Build the configured translator
pub fn from_config(config: &TranslationConfig) -> Arc<dyn Translator> {
    match config.provider {
        TranslationProvider::Google => Arc::new(google::GoogleTranslator::new(
            config.get_endpoint(),
            config.timeout_secs,
        )),
        TranslationProvider::Mock => Arc::new(mock::MockTranslator::working()),
    }
}

pub mod google;
pub mod mock;
