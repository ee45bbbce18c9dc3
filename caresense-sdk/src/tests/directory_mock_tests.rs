//! Mock tests for the doctor directory service

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::core::DirectoryService;
    use crate::error::ErrorKind;
    use crate::services::directory::{DirectoryClient, DirectoryClientBuilder, DoctorQuery, RecordId};

    const DOCTORS_PATH: &str = "/api/v1/doctors/";

    fn create_test_client(mock_server: &MockServer) -> DirectoryClient {
        DirectoryClientBuilder::new()
            .base_url(mock_server.uri())
            .timeout(5)
            .build()
            .expect("Failed to build directory client")
    }

    #[tokio::test]
    async fn test_fetch_list() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(DOCTORS_PATH))
            .and(header_exists("X-Request-ID"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "name": "Dr. Asha Rao", "specialty": "Cardiology", "location": "Mumbai", "rating": 4.9},
                {"id": 2, "name": "Dr. Vikram Shah", "specialty": "Dermatology", "city": "Pune"}
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let records = client.fetch_doctors(&DoctorQuery::default()).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, RecordId::from(1u64));
        assert_eq!(records[0].rating_or_default(), 4.9);
        assert_eq!(records[1].location_label(), "Pune");
    }

    #[tokio::test]
    async fn test_fetch_passes_filters_and_accepts_pagination() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(DOCTORS_PATH))
            .and(query_param("specialty", "Pediatrics"))
            .and(query_param("availability", "today"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 1,
                "next": null,
                "previous": null,
                "results": [{"id": "p-1", "name": "Dr. Meera Iyer", "specialty": "Pediatrics"}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let query = DoctorQuery {
            search: None,
            specialty: Some("Pediatrics".to_string()),
            availability: Some("today".to_string()),
        };
        let records = client.fetch_doctors(&query).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, RecordId::new("p-1"));
    }

    #[tokio::test]
    async fn test_fetch_tolerates_odd_optional_fields() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(DOCTORS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "name": "Dr. Asha Rao", "specialty": "Cardiology"},
                {"id": 2, "name": "Dr. Vikram Shah", "display_name": "Vikram Shah", "specialty": "Dermatology",
                 "languages": ["English", "Marathi"], "phone": 9820000000u64, "hospital": {"id": 7}}
            ])))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let records = client.fetch_doctors(&DoctorQuery::default()).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].display_name, "Dr. Vikram Shah");
        assert_eq!(records[1].spoken_languages.as_deref(), Some("English, Marathi"));
        assert_eq!(records[1].affiliated_facility, None);
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(DOCTORS_PATH))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let err = client.fetch_doctors(&DoctorQuery::default()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Service);
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(err.service_name(), Some("directory"));
    }

    #[tokio::test]
    async fn test_fetch_unexpected_shape() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(DOCTORS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"doctors": []})))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let err = client.fetch_doctors(&DoctorQuery::default()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::RequestFailed);
    }

    #[test]
    fn test_builder_saturates_huge_timeout() {
        let client = DirectoryClientBuilder::new()
            .base_url("http://localhost:8000")
            .timeout(u64::MAX)
            .build()
            .unwrap();
        assert_eq!(client.config().timeout_ms, u64::MAX);
    }
}
