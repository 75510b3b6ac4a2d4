//! Property-based and HTTP tests for the ADGM server API
//!
//! Test categories:
//! - Request parsing (formats, base64 uploads, questions)
//! - HTTP endpoints through the full router

#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;

    use base64::{engine::general_purpose::STANDARD, Engine};
    use compliance_engine::ReportFormat;

    use crate::api::{decode_documents, UploadedDocument};
    use crate::knowledge;

    proptest! {
        /// Property: valid report formats parse regardless of case
        #[test]
        fn valid_formats_recognized(format in prop_oneof![
            Just("json"), Just("JSON"), Just("Json"),
            Just("text"), Just("TEXT"), Just("txt"),
        ]) {
            prop_assert!(format.parse::<ReportFormat>().is_ok(), "Format '{}' should be valid", format);
        }

        /// Property: anything else is rejected
        #[test]
        fn invalid_formats_rejected(format in "[a-z]{2,6}".prop_filter(
            "Must not be valid format",
            |s| !matches!(s.as_str(), "json" | "text" | "txt")
        )) {
            prop_assert!(format.parse::<ReportFormat>().is_err());
        }

        /// Property: decoded uploads carry the original bytes and filename
        #[test]
        fn uploads_decode_to_original_bytes(
            data in prop::collection::vec(any::<u8>(), 0..1000),
            name in "[a-z]{1,12}\\.docx",
        ) {
            let docs = vec![UploadedDocument {
                filename: name.clone(),
                data_base64: STANDARD.encode(&data),
            }];
            let inputs = decode_documents(&docs).unwrap();
            prop_assert_eq!(inputs.len(), 1);
            prop_assert_eq!(inputs[0].source(), name);
        }

        /// Property: every question gets a non-empty answer
        #[test]
        fn questions_always_answered(question in "[a-zA-Z ?%]{1,80}") {
            let answer = knowledge::answer(&question);
            prop_assert!(!answer.answer.is_empty());
            prop_assert!(answer.topics.len() <= knowledge::TOPICS.len());
        }
    }
}

#[cfg(test)]
mod http_endpoint_tests {
    //! HTTP endpoint integration tests using axum-test

    use axum_test::TestServer;
    use base64::{engine::general_purpose::STANDARD, Engine};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use shared_docx::fixtures::DocxBuilder;

    use crate::{router, AppState};

    /// Create a test server with the full router
    fn create_test_server() -> TestServer {
        TestServer::new(router(AppState::default(), 10 * 1024 * 1024)).unwrap()
    }

    fn encoded_docx(paragraphs: &[&str]) -> String {
        STANDARD.encode(DocxBuilder::new().paragraphs(paragraphs).build().unwrap())
    }

    fn onshore_articles() -> serde_json::Value {
        json!({
            "filename": "articles.docx",
            "data_base64": encoded_docx(&[
                "ARTICLES OF ASSOCIATION of Falcon Holdings Ltd",
                "The share capital of the company is USD 50,000.",
                "Any dispute shall be referred to the UAE Federal Courts.",
            ])
        })
    }

    fn board_resolution() -> serde_json::Value {
        json!({
            "filename": "resolution.docx",
            "data_base64": encoded_docx(&[
                "BOARD RESOLUTION",
                "The board of directors resolved that the company opens an account.",
                "Registered in ADGM.",
            ])
        })
    }

    #[tokio::test]
    async fn test_health_returns_200() {
        let server = create_test_server();
        let response = server.get("/health").await;
        response.assert_status_ok();

        let json = response.json::<serde_json::Value>();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["service"], "adgm-server");
    }

    #[tokio::test]
    async fn test_processes_lists_builtin_processes() {
        let server = create_test_server();
        let response = server.get("/api/processes").await;
        response.assert_status_ok();

        let json = response.json::<serde_json::Value>();
        assert!(json["success"].as_bool().unwrap());
        assert_eq!(json["count"], 3);
        assert_eq!(json["processes"][0]["name"], "Company Incorporation");
        assert_eq!(
            json["processes"][0]["required_documents"][2]["key"],
            "ubo_declaration"
        );
    }

    #[tokio::test]
    async fn test_document_types_lists_all_types() {
        let server = create_test_server();
        let response = server.get("/api/document-types").await;
        response.assert_status_ok();

        let json = response.json::<serde_json::Value>();
        assert_eq!(json["count"], 10);
        assert_eq!(json["document_types"][0]["name"], "Articles of Association");
    }

    #[tokio::test]
    async fn test_analyze_incomplete_incorporation() {
        let server = create_test_server();
        let response = server
            .post("/api/analyze")
            .json(&json!({
                "process": "Company Incorporation",
                "documents": [onshore_articles(), board_resolution()]
            }))
            .await;

        response.assert_status_ok();

        let json = response.json::<serde_json::Value>();
        assert!(json["success"].as_bool().unwrap());
        assert_eq!(json["overall_status"], "requires_attention");
        assert_eq!(json["completion_percentage"], 50.0);
        assert_eq!(
            json["missing_documents"],
            json!(["ubo_declaration", "register_members_directors"])
        );
        assert!(json["red_flags"].as_u64().unwrap() >= 2);
        assert!(json["high_severity_issues"].as_u64().unwrap() >= 1);
        assert_eq!(json["flags"][0]["severity"], "high");
    }

    #[tokio::test]
    async fn test_analyze_reports_corrupt_upload() {
        let server = create_test_server();
        let response = server
            .post("/api/analyze")
            .json(&json!({
                "process": "company_incorporation",
                "documents": [
                    { "filename": "corrupt.docx", "data_base64": STANDARD.encode(b"garbage") },
                    board_resolution()
                ]
            }))
            .await;

        response.assert_status_ok();

        let json = response.json::<serde_json::Value>();
        assert_eq!(json["documents_failed"], 1);
        assert_eq!(json["documents"][0]["status"], "failed");
        assert_eq!(json["documents"][1]["status"], "analyzed");
    }

    #[tokio::test]
    async fn test_analyze_unknown_process_returns_404() {
        let server = create_test_server();
        let response = server
            .post("/api/analyze")
            .json(&json!({
                "process": "Liquidation",
                "documents": [board_resolution()]
            }))
            .await;

        response.assert_status_not_found();

        let json = response.json::<serde_json::Value>();
        assert_eq!(json["code"], "UNKNOWN_PROCESS");
        assert!(!json["success"].as_bool().unwrap());
    }

    #[tokio::test]
    async fn test_analyze_rejects_empty_batch() {
        let server = create_test_server();
        let response = server
            .post("/api/analyze")
            .json(&json!({ "process": "employment", "documents": [] }))
            .await;

        response.assert_status_bad_request();
        assert_eq!(
            response.json::<serde_json::Value>()["code"],
            "INVALID_REQUEST"
        );
    }

    #[tokio::test]
    async fn test_analyze_rejects_bad_base64() {
        let server = create_test_server();
        let response = server
            .post("/api/analyze")
            .json(&json!({
                "process": "employment",
                "documents": [{ "filename": "contract.docx", "data_base64": "%%%" }]
            }))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_text_report_download() {
        let server = create_test_server();
        let response = server
            .post("/api/report")
            .json(&json!({
                "process": "company_incorporation",
                "documents": [onshore_articles(), board_resolution()],
                "format": "text"
            }))
            .await;

        response.assert_status_ok();
        let content_type = response.header("content-type");
        assert!(content_type.to_str().unwrap().starts_with("text/plain"));

        let text = response.text();
        assert!(text.contains("EXECUTIVE SUMMARY"));
        assert!(text.contains("Completion: 50.0%"));
        assert!(text.contains("UBO Declaration Form"));
    }

    #[tokio::test]
    async fn test_json_report_download() {
        let server = create_test_server();
        let response = server
            .post("/api/report")
            .json(&json!({
                "process": "company_incorporation",
                "documents": [board_resolution()]
            }))
            .await;

        response.assert_status_ok();
        assert_eq!(response.header("content-type"), "application/json");
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["process_key"], "company_incorporation");
    }

    #[tokio::test]
    async fn test_report_rejects_unknown_format() {
        let server = create_test_server();
        let response = server
            .post("/api/report")
            .json(&json!({
                "process": "company_incorporation",
                "documents": [board_resolution()],
                "format": "pdf"
            }))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_ask_jurisdiction_question() {
        let server = create_test_server();
        let response = server
            .post("/api/ask")
            .json(&json!({ "question": "Which court handles disputes?" }))
            .await;

        response.assert_status_ok();
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["topics"], json!(["jurisdiction"]));
    }

    #[tokio::test]
    async fn test_ask_rejects_blank_question() {
        let server = create_test_server();
        let response = server
            .post("/api/ask")
            .json(&json!({ "question": "   " }))
            .await;

        response.assert_status_bad_request();
    }
}
