//! End-to-end tests for the proxy pipeline against scripted backends.
//!
//! Run with:
//!   cargo test -p stylist-core --test stylist_tests

use std::sync::Arc;

use mock_backend::ScriptedBackend;
use serde_json::json;
use stylist_core::{is_parse_failure, AiRequest, Stylist, StylistError, GENERATE_METHOD};

fn request(value: serde_json::Value) -> AiRequest {
    serde_json::from_value(value).unwrap()
}

fn stylist(backend: &Arc<ScriptedBackend>) -> Stylist {
    Stylist::new(backend.clone(), Some("server-key".to_string()))
}

// ============================================================================
// Validation happens before the upstream
// ============================================================================

mod validation_tests {
    use super::*;

    #[tokio::test]
    async fn test_vision_without_image_makes_no_calls() {
        let backend = Arc::new(ScriptedBackend::new());
        let err = stylist(&backend)
            .handle(request(json!({ "task": "vision" })))
            .await
            .unwrap_err();

        assert!(matches!(err, StylistError::MissingField("imageDataUrl")));
        assert!(err.is_local());
        assert_eq!(backend.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_credential() {
        let backend = Arc::new(ScriptedBackend::new());
        let stylist = Stylist::new(backend.clone(), None);

        let err = stylist
            .handle(request(json!({ "task": "noteSummarize", "text": "hi" })))
            .await
            .unwrap_err();

        assert!(matches!(err, StylistError::MissingCredential));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
        assert_eq!(backend.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_server_key_counts_as_missing() {
        let backend = Arc::new(ScriptedBackend::new());
        let stylist = Stylist::new(backend, Some("   ".to_string()));
        assert!(!stylist.has_default_key());
        assert!(matches!(stylist.resolve_key(None), Err(StylistError::MissingCredential)));
    }
}

// ============================================================================
// Credentials and discovery
// ============================================================================

mod discovery_tests {
    use super::*;

    #[tokio::test]
    async fn test_request_key_overrides_server_key() {
        let backend = Arc::new(ScriptedBackend::new());
        stylist(&backend)
            .handle(request(json!({
                "task": "noteSummarize",
                "text": "linen in summer",
                "apiKey": "user-key"
            })))
            .await
            .unwrap();

        assert_eq!(backend.last_call().unwrap().api_key, "user-key");
    }

    #[tokio::test]
    async fn test_discovery_prefers_flash_and_strips_prefix() {
        let backend = Arc::new(ScriptedBackend::new().with_models(vec![
            ScriptedBackend::model("models/text-embedding-004", &["embedContent"]),
            ScriptedBackend::model("models/gemini-1.5-pro", &[GENERATE_METHOD]),
            ScriptedBackend::model("models/gemini-1.5-flash", &[GENERATE_METHOD]),
        ]));

        stylist(&backend)
            .handle(request(json!({ "task": "noteSummarize", "text": "x" })))
            .await
            .unwrap();

        assert_eq!(backend.last_call().unwrap().model, "gemini-1.5-flash");
    }

    #[tokio::test]
    async fn test_no_usable_model() {
        let backend = Arc::new(ScriptedBackend::new().with_models(vec![ScriptedBackend::model(
            "models/text-embedding-004",
            &["embedContent"],
        )]));

        let err = stylist(&backend)
            .handle(request(json!({ "task": "noteSummarize", "text": "x" })))
            .await
            .unwrap_err();

        assert!(matches!(err, StylistError::NoUsableModel));
        assert_eq!(backend.generate_calls(), 0);
    }

    #[tokio::test]
    async fn test_rejected_key_surfaces_as_authentication() {
        let backend = Arc::new(ScriptedBackend::new().rejecting_keys("API key not valid"));

        let err = stylist(&backend)
            .handle(request(json!({ "task": "noteSummarize", "text": "x" })))
            .await
            .unwrap_err();

        assert!(matches!(err, StylistError::Authentication(_)));
        assert!(!err.is_local());
        assert_eq!(backend.generate_calls(), 0);
    }

    #[tokio::test]
    async fn test_list_models_uses_override() {
        let backend = Arc::new(ScriptedBackend::new());
        let models = stylist(&backend).list_models(Some("other")).await.unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(backend.list_calls(), 1);
    }
}

// ============================================================================
// Generation and normalization
// ============================================================================

mod generation_tests {
    use super::*;

    #[tokio::test]
    async fn test_wrapped_json_is_normalized() {
        let backend = Arc::new(
            ScriptedBackend::new()
                .with_reply("Sure! ```json\n{\"tags\": [\"earthy\"], \"do\": [], \"dont\": []}\n```"),
        );

        let value = stylist(&backend)
            .handle(request(json!({ "task": "noteSummarize", "text": "browns and olive" })))
            .await
            .unwrap();

        assert_eq!(value["tags"], json!(["earthy"]));
    }

    #[tokio::test]
    async fn test_prose_reply_becomes_sentinel() {
        let backend = Arc::new(ScriptedBackend::new().with_reply("I'd suggest the navy coat."));

        let value = stylist(&backend)
            .handle(request(json!({
                "task": "mixExplain",
                "selectedItems": [{ "name": "Navy coat", "category": "outer" }],
                "occasion": "office",
                "tempC": 8
            })))
            .await
            .unwrap();

        assert!(is_parse_failure(&value));
        assert_eq!(value["raw"], "I'd suggest the navy coat.");
    }

    #[tokio::test]
    async fn test_vision_sends_inline_image() {
        let backend = Arc::new(ScriptedBackend::new().with_reply(r#"{"name": "Tee"}"#));

        let value = stylist(&backend)
            .handle(request(json!({
                "task": "vision",
                "imageDataUrl": "data:image/png;base64,iVBORw0KGgo="
            })))
            .await
            .unwrap();

        assert_eq!(value["name"], "Tee");
        let call = backend.last_call().unwrap();
        let image = call.image.unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, "iVBORw0KGgo=");
        assert!(!call.prompt.contains("iVBORw0KGgo="));
    }

    #[tokio::test]
    async fn test_upstream_failure() {
        let backend = Arc::new(ScriptedBackend::new().failing_generation("503 overloaded"));

        let err = stylist(&backend)
            .handle(request(json!({
                "task": "stylist",
                "closet": [{ "id": "a1", "category": "top", "location": "home" }],
                "occasion": "gym",
                "tempC": 21,
                "location": "home",
                "style": "sporty"
            })))
            .await
            .unwrap_err();

        assert!(matches!(err, StylistError::Upstream(msg) if msg.contains("overloaded")));
    }
}
