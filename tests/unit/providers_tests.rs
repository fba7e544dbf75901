/*!
 * Tests for translation provider implementations
 */

use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

use cuedub::app_config::{TranslationConfig, TranslationProvider};
use cuedub::errors::{ProviderError, TranslationError};
use cuedub::providers::google::GoogleTranslator;
use cuedub::providers::mock::{MockBehavior, MockTranslator};
use cuedub::providers::{self, Translator};

#[test]
fn test_mock_translator_working_shouldTagWithTargetLanguage() {
    let translator = MockTranslator::working();
    let result = tokio_test::block_on(translator.translate("Hello", "en", "es"));

    assert_eq!(assert_ok!(result), "[es] Hello");
    assert_eq!(translator.request_count(), 1);
    assert_eq!(translator.requests()[0].source_language, "en");
}

#[test]
fn test_mock_translator_failing_shouldReturnProviderError() {
    let translator = MockTranslator::failing();
    let error = assert_err!(tokio_test::block_on(translator.translate("Hello", "en", "es")));

    assert!(matches!(
        error,
        TranslationError::Provider(ProviderError::ApiError { status_code: 503, .. })
    ));
}

#[tokio::test]
async fn test_mock_translator_gated_shouldWaitForRelease() {
    let translator = MockTranslator::gated();
    let shared = translator.clone();
    let pending = tokio::spawn(async move { shared.translate("Hi", "en", "fr").await });

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!pending.is_finished());
    assert_eq!(translator.request_count(), 1);

    translator.release(1);
    let result = pending.await.expect("task");
    assert_eq!(assert_ok!(result), "[fr] Hi");
}

#[tokio::test]
async fn test_mock_translator_slow_shouldStillTranslate() {
    let translator = MockTranslator::new(MockBehavior::Slow { delay_ms: 10 });
    assert_eq!(translator.translate("Hi", "en", "de").await.unwrap(), "[de] Hi");
}

#[tokio::test]
async fn test_from_config_withMockProvider_shouldBuildWorkingTranslator() {
    let config = TranslationConfig {
        provider: TranslationProvider::Mock,
        ..TranslationConfig::default()
    };
    let translator: Arc<dyn Translator> = providers::from_config(&config);

    assert_ok!(translator.test_connection().await);
    assert_eq!(translator.translate("Bye", "en", "pt-BR").await.unwrap(), "[pt-BR] Bye");
}

#[tokio::test]
async fn test_google_translator_withUnreachableEndpoint_shouldFailWithProviderError() {
    // Nothing listens on the discard port
    let translator = GoogleTranslator::new("http://127.0.0.1:9", 2);
    let error = assert_err!(translator.translate("Hello", "en", "fr").await);

    assert!(matches!(error, TranslationError::Provider(_)), "unexpected error: {:?}", error);
    assert!(translator.test_connection().await.is_err());
}
