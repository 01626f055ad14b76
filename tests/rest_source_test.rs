use httpmock::prelude::*;
use plate_gallery::domain::ports::RecordSource;
use plate_gallery::{
    Catalog, CollectorForm, GalleryError, ImageUpload, LocalStorage, PalindromeForm, QueryCache,
    QueryTag, RestSource, UploadService,
};
use tempfile::TempDir;

fn collectors_json() -> serde_json::Value {
    serde_json::json!([
        {"id": "c1", "name": "Ada", "email": null, "location": "Boston", "bio": null,
         "created_at": "2024-01-01T00:00:00+00:00", "updated_at": "2024-01-01T00:00:00+00:00"},
        {"id": "c2", "name": "Grace", "email": "grace@example.com", "location": null, "bio": null,
         "created_at": "2024-01-02T00:00:00+00:00", "updated_at": "2024-01-02T00:00:00+00:00"},
        {"id": "c3", "name": "Linus", "email": null, "location": null, "bio": null,
         "created_at": "2024-01-03T00:00:00+00:00", "updated_at": "2024-01-03T00:00:00+00:00"}
    ])
}

fn palindromes_json() -> serde_json::Value {
    serde_json::json!([
        {"id": "p1", "collector_id": "c2", "license_plate": "ABC-CBA", "image_url": "https://cdn/p1.jpg",
         "image_storage_path": "palindromes/p1.jpg", "car_type": "Sedan", "location_found": "NY",
         "date_found": "2024-02-01", "additional_notes": null, "uploaded_by_admin_id": "admin",
         "created_at": "2024-03-01T10:00:00.000000+00:00", "updated_at": "2024-03-01T10:00:00+00:00"},
        {"id": "p2", "collector_id": "c1", "license_plate": "1221", "image_url": "https://cdn/p2.jpg",
         "image_storage_path": "palindromes/p2.jpg", "car_type": null, "location_found": "NY",
         "date_found": null, "additional_notes": null, "uploaded_by_admin_id": "admin",
         "created_at": "2024-02-20T10:00:00+00:00", "updated_at": "2024-02-20T10:00:00+00:00"},
        {"id": "p3", "collector_id": "c2", "license_plate": "XYZYX", "image_url": "https://cdn/p3.jpg",
         "image_storage_path": "palindromes/p3.jpg", "car_type": "Truck", "location_found": "LA",
         "date_found": "2024-01-15", "additional_notes": "rainy", "uploaded_by_admin_id": "admin",
         "created_at": "2024-02-25T10:00:00+00:00", "updated_at": "2024-02-25T10:00:00+00:00"},
        {"id": "p4", "collector_id": "c1", "license_plate": "RACECAR", "image_url": "https://cdn/p4.jpg",
         "image_storage_path": "palindromes/p4.jpg", "car_type": null, "location_found": null,
         "date_found": null, "additional_notes": null, "uploaded_by_admin_id": "admin",
         "created_at": "2024-01-10T10:00:00+00:00", "updated_at": "2024-01-10T10:00:00+00:00"}
    ])
}

#[tokio::test]
async fn test_leaderboard_over_rest_source() {
    let server = MockServer::start();

    let collectors_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/collectors")
            .query_param("select", "*")
            .query_param("order", "name")
            .header("apikey", "anon-key")
            .header("authorization", "Bearer anon-key");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(collectors_json());
    });
    let palindromes_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/palindromes")
            .query_param("order", "created_at.desc");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(palindromes_json());
    });

    let catalog = Catalog::new(RestSource::new(server.base_url(), "anon-key"));
    let board = catalog.leaderboard().await.unwrap();

    collectors_mock.assert();
    palindromes_mock.assert();

    // c1 and c2 both have two finds; c1's first upload (Jan 10) is earlier.
    assert_eq!(board.len(), 2);
    assert_eq!(board[0].collector.id, "c1");
    assert_eq!(board[0].rank, 1);
    assert_eq!(board[1].collector.id, "c2");
    assert_eq!(board[1].rank, 2);
    assert!(board.iter().all(|e| e.collector.id != "c3"));
}

#[tokio::test]
async fn test_collector_stats_over_rest_source() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/collectors");
        then.status(200).json_body(collectors_json());
    });
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/palindromes");
        then.status(200).json_body(palindromes_json());
    });

    let catalog = Catalog::new(RestSource::new(server.base_url(), "anon-key"));
    let (collector, stats) = catalog.collector_stats("c2").await.unwrap();

    assert_eq!(collector.name, "Grace");
    assert_eq!(stats.total_finds, 2);
    assert_eq!(stats.earliest_find.unwrap().to_string(), "2024-01-15");
    assert_eq!(stats.latest_find.unwrap().to_string(), "2024-02-01");
    assert_eq!(stats.favorite_location.as_deref(), Some("NY"));
    assert_eq!(stats.locations_count, 2);
    assert_eq!(stats.car_types_count, 2);
}

#[tokio::test]
async fn test_admin_profile_lookup_filters_by_id() {
    let server = MockServer::start();
    let profile_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/user_profiles")
            .query_param("id", "eq.admin-1")
            .query_param("select", "id,email,name,is_admin");
        then.status(200).json_body(serde_json::json!([
            {"id": "admin-1", "email": "root@example.com", "name": "Root", "is_admin": true}
        ]));
    });

    let source = RestSource::new(format!("{}/", server.base_url()), "service-key");
    let profile = source.fetch_admin_profile("admin-1").await.unwrap().unwrap();

    profile_mock.assert();
    assert!(profile.is_admin);
    assert_eq!(profile.name.as_deref(), Some("Root"));
}

#[tokio::test]
async fn test_http_error_status_is_reported() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/collectors");
        then.status(401);
    });

    let source = RestSource::new(server.base_url(), "bad-key");
    let err = source.fetch_collectors().await.unwrap_err();

    match err {
        GalleryError::HttpStatusError { status, url } => {
            assert_eq!(status, 401);
            assert!(url.ends_with("/rest/v1/collectors"));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_cache_serves_repeat_reads_until_invalidated() {
    let server = MockServer::start();
    let collectors_mock = server.mock(|when, then| {
        when.method(GET).path("/rest/v1/collectors");
        then.status(200).json_body(collectors_json());
    });

    let cache = QueryCache::new(RestSource::new(server.base_url(), "anon-key"));
    cache.fetch_collectors().await.unwrap();
    cache.fetch_collectors().await.unwrap();
    collectors_mock.assert_hits(1);

    cache.invalidate(QueryTag::AFTER_COLLECTOR_WRITE).await;
    cache.fetch_collectors().await.unwrap();
    collectors_mock.assert_hits(2);
}

fn mock_admin_lookup(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/user_profiles")
            .query_param("id", "eq.admin-1");
        then.status(200).json_body(serde_json::json!([
            {"id": "admin-1", "email": "root@example.com", "name": "Root", "is_admin": true}
        ]));
    });
}

#[tokio::test]
async fn test_create_collector_posts_row_and_refreshes_reads() {
    let server = MockServer::start();
    mock_admin_lookup(&server);
    let list_mock = server.mock(|when, then| {
        when.method(GET).path("/rest/v1/collectors");
        then.status(200).json_body(collectors_json());
    });
    let insert_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/v1/collectors")
            .header("prefer", "return=representation")
            .header("apikey", "service-key")
            .json_body_partial(
                r#"{"name": "Hedy", "email": "hedy@example.com", "location": null, "created_by_admin_id": "admin-1"}"#,
            );
        then.status(201).json_body(serde_json::json!([
            {"id": "c9", "name": "Hedy", "email": "hedy@example.com", "location": null,
             "created_at": "2024-05-01T00:00:00+00:00", "updated_at": "2024-05-01T00:00:00+00:00"}
        ]));
    });

    let catalog = Catalog::new(RestSource::new(server.base_url(), "service-key"));
    assert_eq!(catalog.collectors().await.unwrap().len(), 3);
    catalog.collectors().await.unwrap();
    list_mock.assert_hits(1);

    let form = CollectorForm {
        name: "Hedy".to_string(),
        email: Some("hedy@example.com".to_string()),
        location: Some("  ".to_string()),
        ..Default::default()
    };
    let created = catalog.create_collector(Some("admin-1"), &form).await.unwrap();

    insert_mock.assert();
    assert_eq!(created.id, "c9");
    catalog.collectors().await.unwrap();
    list_mock.assert_hits(2);
}

#[tokio::test]
async fn test_rejected_collector_form_is_never_sent() {
    let server = MockServer::start();
    mock_admin_lookup(&server);
    let insert_mock = server.mock(|when, then| {
        when.method(POST).path("/rest/v1/collectors");
        then.status(201).json_body(serde_json::json!([]));
    });

    let catalog = Catalog::new(RestSource::new(server.base_url(), "service-key"));
    let form = CollectorForm {
        name: "Hedy".to_string(),
        bio: Some("b".repeat(1001)),
        ..Default::default()
    };
    let err = catalog.create_collector(Some("admin-1"), &form).await.unwrap_err();

    assert_eq!(err.status_code(), 400);
    assert!(err.to_string().contains("Bio must be 1000 characters or less"));
    insert_mock.assert_hits(0);
}

#[tokio::test]
async fn test_create_palindrome_uploads_then_inserts() {
    let server = MockServer::start();
    mock_admin_lookup(&server);
    let insert_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/v1/palindromes")
            .header("prefer", "return=representation")
            .json_body_partial(
                r#"{"collector_id": "c1", "license_plate": "RACECAR", "uploaded_by_admin_id": "admin-1", "date_found": "2024-04-02"}"#,
            );
        then.status(201).json_body(serde_json::json!([
            {"id": "p9", "collector_id": "c1", "license_plate": "RACECAR",
             "image_url": "https://cdn.example.com/images/palindromes/1-racecar.png",
             "image_storage_path": "palindromes/1-racecar.png", "date_found": "2024-04-02",
             "uploaded_by_admin_id": "admin-1", "created_at": "2024-04-03T09:00:00+00:00"}
        ]));
    });

    let dir = TempDir::new().unwrap();
    let source = RestSource::new(server.base_url(), "service-key");
    let storage = LocalStorage::new(dir.path().to_string_lossy().to_string())
        .with_public_base_url("https://cdn.example.com");
    let uploads = UploadService::new(storage, source.clone());
    let catalog = Catalog::new(source);

    let form = PalindromeForm {
        license_plate: "RACECAR".to_string(),
        collector_id: "c1".to_string(),
        image: Some(ImageUpload {
            file_name: "racecar.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![9; 32],
        }),
        date_found: Some("2024-04-02".to_string()),
        ..Default::default()
    };
    let find = catalog
        .create_palindrome(&uploads, Some("admin-1"), form)
        .await
        .unwrap();

    insert_mock.assert();
    assert_eq!(find.id, "p9");
    let stored: Vec<_> = std::fs::read_dir(dir.path().join("images/palindromes"))
        .unwrap()
        .collect();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn test_delete_palindrome_by_id() {
    let server = MockServer::start();
    mock_admin_lookup(&server);
    let delete_mock = server.mock(|when, then| {
        when.method(DELETE)
            .path("/rest/v1/palindromes")
            .query_param("id", "eq.p2");
        then.status(200).json_body(serde_json::json!([{"id": "p2"}]));
    });
    server.mock(|when, then| {
        when.method(DELETE)
            .path("/rest/v1/palindromes")
            .query_param("id", "eq.missing");
        then.status(200).json_body(serde_json::json!([]));
    });

    let catalog = Catalog::new(RestSource::new(server.base_url(), "service-key"));
    catalog
        .delete_palindrome(Some("admin-1"), "p2")
        .await
        .unwrap();
    delete_mock.assert();

    let err = catalog
        .delete_palindrome(Some("admin-1"), "missing")
        .await
        .unwrap_err();
    assert!(matches!(err, GalleryError::NotFoundError { .. }));
}
