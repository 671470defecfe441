#[cfg(test)]
mod tests {
    use std::time::Duration;

    use knowledge_ox::{ApiResult, ClientError, FileUpload, KnowledgeClient, Settings};
    use serde_json::json;
    use wiremock::matchers::{any, body_json, body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings() -> Settings {
        Settings::new("sk-test", "", "vs_1")
    }

    async fn setup() -> (MockServer, KnowledgeClient) {
        let server = MockServer::start().await;
        let client = KnowledgeClient::builder().base_url(server.uri()).build();
        (server, client)
    }

    async fn mount_upload(server: &MockServer, raw_id: &str, attached: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path("/files"))
            .and(body_string_contains("assistants"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": raw_id, "created_at": 1_700_000_000})),
            )
            .expect(1)
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/vector_stores/vs_1/files"))
            .and(body_json(json!({"file_id": raw_id})))
            .respond_with(ResponseTemplate::new(200).set_body_json(attached))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_missing_settings_fail_without_requests() {
        let (server, client) = setup().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let upload = FileUpload::new("a.txt", b"hello".to_vec());
        for settings in [Settings::new("", "", "vs_1"), Settings::new("sk", "", "")] {
            assert!(!client.list_files(&settings).await.is_ok());
            assert!(!client.upload_file(&upload, &settings).await.is_ok());
            assert!(!client.replace_file("file-1", &upload, &settings).await.is_ok());
            assert!(!client.delete_file("file-1", &settings).await.is_ok());
            assert!(!client.ask("hi", &[], &settings).await.is_ok());
        }

        let missing_key = client.list_files(&Settings::new("", "", "vs_1")).await;
        assert_eq!(
            missing_key.error(),
            Some(ClientError::MissingApiKey.to_string().as_str())
        );
        let missing_store = client.delete_file("file-1", &Settings::new("sk", "", "")).await;
        assert_eq!(
            missing_store.error(),
            Some(ClientError::MissingVectorStoreId.to_string().as_str())
        );

        let err = client
            .create_vector_store("docs", &Settings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::MissingApiKey));
    }

    #[tokio::test]
    async fn test_list_enriches_concurrently_and_keeps_order() {
        let (server, client) = setup().await;
        Mock::given(method("GET"))
            .and(path("/vector_stores/vs_1/files"))
            .and(query_param("limit", "100"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list",
                "data": [
                    {"id": "file-a", "status": "completed", "usage_bytes": 10, "created_at": 1},
                    {"id": "file-b", "status": "in_progress", "usage_bytes": 20, "created_at": 2},
                    {"id": "file-c", "status": "failed", "usage_bytes": 30, "created_at": 3},
                    {"status": "completed"}
                ],
                "has_more": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        // Slowest detail first so completion order differs from listing order
        Mock::given(method("GET"))
            .and(path("/files/file-a"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_millis(200))
                    .set_body_json(json!({"id": "file-a", "filename": "a.pdf", "bytes": 1000})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/files/file-b"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": {"message": "gone"}})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/files/file-c"))
            .respond_with(ResponseTemplate::new(200).set_body_string("definitely not json"))
            .mount(&server)
            .await;

        let files = client.list_files(&settings()).await.into_result().unwrap();

        let ids: Vec<&str> = files.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["file-a", "file-b", "file-c"]);

        assert_eq!(files[0].filename, "a.pdf");
        assert_eq!(files[0].bytes, 1000);
        assert_eq!(files[0].status, "completed");

        assert_eq!(files[1].filename, "file-b");
        assert_eq!(files[1].bytes, 20);
        assert_eq!(files[2].filename, "file-c");
        assert_eq!(files[2].status, "failed");
    }

    #[tokio::test]
    async fn test_list_failure_surfaces_remote_message() {
        let (server, client) = setup().await;
        Mock::given(method("GET"))
            .and(path("/vector_stores/vs_1/files"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error": {"message": "bad key"}})),
            )
            .mount(&server)
            .await;

        let result = client.list_files(&settings()).await;
        assert_eq!(result, ApiResult::failure("bad key"));
    }

    #[tokio::test]
    async fn test_upload_attaches_and_then_lists() {
        let (server, client) = setup().await;
        mount_upload(
            &server,
            "file-new",
            json!({"id": "file-new", "object": "vector_store.file", "status": "in_progress", "usage_bytes": 0}),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/vector_stores/vs_1/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": "file-new", "status": "completed", "usage_bytes": 11}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/files/file-new"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "file-new", "filename": "guide.txt", "bytes": 11
            })))
            .mount(&server)
            .await;

        let upload = FileUpload::new("guide.txt", b"hello world".to_vec());
        let file = client.upload_file(&upload, &settings()).await.into_result().unwrap();
        assert_eq!(file.id, "file-new");
        assert_eq!(file.filename, "guide.txt");
        assert_eq!(file.bytes, 11);
        assert_eq!(file.status, "in_progress");
        assert_eq!(file.created_at, 1_700_000_000);

        let listed = client.list_files(&settings()).await.into_result().unwrap();
        assert!(listed.iter().any(|f| f.filename == "guide.txt"));
    }

    #[tokio::test]
    async fn test_upload_stops_when_raw_upload_fails() {
        let (server, client) = setup().await;
        Mock::given(method("POST"))
            .and(path("/files"))
            .respond_with(
                ResponseTemplate::new(413).set_body_json(json!({"error": {"message": "too large"}})),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/vector_stores/vs_1/files"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let upload = FileUpload::new("big.bin", vec![0; 16]);
        let result = client.upload_file(&upload, &settings()).await;
        assert_eq!(result.error(), Some("too large"));
    }

    #[tokio::test]
    async fn test_upload_reports_attach_failure() {
        let (server, client) = setup().await;
        Mock::given(method("POST"))
            .and(path("/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "file-1"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/vector_stores/vs_1/files"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let upload = FileUpload::new("a.txt", b"a".to_vec());
        let result = client.upload_file(&upload, &settings()).await;
        assert_eq!(result.error(), Some("503 Service Unavailable"));
    }

    #[tokio::test]
    async fn test_replace_returns_upload_even_if_delete_fails() {
        let (server, client) = setup().await;
        mount_upload(
            &server,
            "file-v2",
            json!({"id": "file-v2", "status": "completed", "usage_bytes": 3}),
        )
        .await;
        Mock::given(method("DELETE"))
            .and(path("/vector_stores/vs_1/files/file-v1"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let upload = FileUpload::new("doc.txt", b"new".to_vec());
        let result = client.replace_file("file-v1", &upload, &settings()).await;

        let file = result.into_result().unwrap();
        assert_eq!(file.id, "file-v2");
        assert_eq!(file.status, "completed");
    }

    #[tokio::test]
    async fn test_replace_skips_delete_when_upload_fails() {
        let (server, client) = setup().await;
        Mock::given(method("POST"))
            .and(path("/files"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": {"message": "bad file"}})))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let upload = FileUpload::new("doc.txt", b"new".to_vec());
        let result = client.replace_file("file-v1", &upload, &settings()).await;
        assert_eq!(result.error(), Some("bad file"));
    }

    #[tokio::test]
    async fn test_delete_reports_true() {
        let (server, client) = setup().await;
        Mock::given(method("DELETE"))
            .and(path("/vector_stores/vs_1/files/file-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": "file-1", "object": "vector_store.file.deleted", "deleted": true})),
            )
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(client.delete_file("file-1", &settings()).await, ApiResult::Ok(true));
    }

    #[tokio::test]
    async fn test_delete_blank_file_id_issues_no_request() {
        let (server, client) = setup().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let result = client.delete_file("  ", &settings()).await;
        assert_eq!(result.error(), Some("File ID cannot be empty."));
    }

    #[tokio::test]
    async fn test_create_vector_store() {
        let (server, client) = setup().await;
        Mock::given(method("POST"))
            .and(path("/vector_stores"))
            .and(body_json(json!({"name": "Team docs"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": "vs_new", "object": "vector_store", "name": "Team docs"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        // Only the API key matters here; no store id is configured yet
        let settings = Settings::new("sk-test", "", "");
        let created = client
            .create_vector_store("  Team docs ", &settings)
            .await
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(created.id, "vs_new");
        assert_eq!(created.name.as_deref(), Some("Team docs"));
    }

    #[tokio::test]
    async fn test_create_vector_store_preconditions_are_errors() {
        let (server, client) = setup().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client
            .create_vector_store("   ", &settings())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::EmptyStoreName));
    }

    #[tokio::test]
    async fn test_create_vector_store_remote_failure_is_a_result() {
        let (server, client) = setup().await;
        Mock::given(method("POST"))
            .and(path("/vector_stores"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let result = client.create_vector_store("docs", &settings()).await.unwrap();
        assert_eq!(result.error(), Some("429 Too Many Requests"));
    }
}
