use anyhow::Result;
use plate_gallery::utils::validation::validate_palindrome_form;
use plate_gallery::{
    Catalog, CollectorForm, GalleryFilter, ImageUpload, LocalStorage, PalindromeForm,
    SnapshotSource, UploadService,
};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

const SNAPSHOT: &str = r#"{
  "collectors": [
    {"id": "c1", "name": "Maya", "location": "Portland"},
    {"id": "c2", "name": "Theo"},
    {"id": "", "name": "Broken row"}
  ],
  "palindromes": [
    {"id": "p1", "collector_id": "c1", "license_plate": "TOT 1 TOT", "location_found": "Portland",
     "car_type": "Van", "date_found": "2023-11-02", "uploaded_by_admin_id": "u-admin",
     "created_at": "2023-11-03T08:00:00Z"},
    {"id": "p2", "collector_id": "c1", "license_plate": "A-1-A", "location_found": "Salem",
     "car_type": "Van", "date_found": "2023-12-24", "created_at": "2023-12-25T08:00:00Z"},
    {"id": "p3", "collector_id": "gone", "license_plate": "OXO",
     "created_at": "2023-10-01T08:00:00Z"},
    {"id": "p4", "collector_id": "c2", "license_plate": "NO CREATED AT"}
  ],
  "user_profiles": [
    {"id": "u-admin", "email": "admin@example.com", "name": "Site Admin", "is_admin": true},
    {"id": "u-viewer", "email": "viewer@example.com", "is_admin": false}
  ]
}"#;

async fn snapshot_source() -> Result<(NamedTempFile, SnapshotSource)> {
    let mut file = NamedTempFile::new()?;
    file.write_all(SNAPSHOT.as_bytes())?;
    let source = SnapshotSource::from_file(file.path()).await?;
    Ok((file, source))
}

#[tokio::test]
async fn test_snapshot_leaderboard_skips_bad_and_orphan_rows() -> Result<()> {
    let (_file, source) = snapshot_source().await?;
    let catalog = Catalog::new(source);

    let board = catalog.leaderboard().await?;
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].collector.name, "Maya");
    assert_eq!(board[0].total_finds, 2);

    let summaries = catalog.collector_summaries().await?;
    let names: Vec<&str> = summaries
        .iter()
        .map(|s| s.collector.name.as_str())
        .collect();
    assert_eq!(names, vec!["Maya", "Theo"]);
    assert_eq!(summaries[1].total_palindromes, 0);
    Ok(())
}

#[tokio::test]
async fn test_snapshot_stats_and_gallery() -> Result<()> {
    let (_file, source) = snapshot_source().await?;
    let catalog = Catalog::new(source);

    let (_, stats) = catalog.collector_stats("c1").await?;
    assert_eq!(stats.total_finds, 2);
    assert_eq!(stats.favorite_car_type.as_deref(), Some("Van"));
    assert_eq!(stats.car_types_count, 1);
    assert_eq!(stats.favorite_location.as_deref(), Some("Portland"));
    assert_eq!(stats.locations_count, 2);

    let all = catalog.gallery(&GalleryFilter::default()).await?;
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].find.license_plate, "A-1-A");
    assert_eq!(all[2].collector_name, "Unknown Collector");

    let admin_uploaded = all.iter().find(|i| i.find.id == "p1").unwrap();
    assert_eq!(
        admin_uploaded.uploaded_by_admin_name.as_deref(),
        Some("Site Admin")
    );

    let salem = catalog
        .gallery(&GalleryFilter {
            search: Some("salem".to_string()),
            ..Default::default()
        })
        .await?;
    assert_eq!(salem.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_validated_submission_then_admin_upload() -> Result<()> {
    let (_file, source) = snapshot_source().await?;
    let store = TempDir::new()?;

    let image = ImageUpload {
        file_name: "level plate.png".to_string(),
        content_type: "image/png".to_string(),
        bytes: vec![1, 2, 3, 4],
    };
    let form = PalindromeForm {
        license_plate: "LEVEL".to_string(),
        collector_id: "c2".to_string(),
        image: Some(image.clone()),
        ..Default::default()
    };
    assert!(validate_palindrome_form(&form).is_valid());

    let storage = LocalStorage::new(store.path().to_string_lossy().to_string())
        .with_public_base_url("https://cdn.example.com");
    let service = UploadService::new(storage, source);

    let denied = service.upload(Some("u-viewer"), image.clone()).await;
    assert_eq!(denied.unwrap_err().status_code(), 403);

    let receipt = service.upload(Some("u-admin"), image).await?;
    assert!(receipt
        .public_url
        .starts_with("https://cdn.example.com/images/palindromes/"));
    assert!(receipt.public_url.ends_with("-level_plate.png"));
    assert!(store.path().join("images").join(&receipt.path).exists());
    Ok(())
}

#[tokio::test]
async fn test_admin_writes_are_saved_to_the_snapshot() -> Result<()> {
    let (file, source) = snapshot_source().await?;
    let store = TempDir::new()?;
    let catalog = Catalog::new(source);

    let collector = catalog
        .create_collector(
            Some("u-admin"),
            &CollectorForm {
                name: "Theo".to_string(),
                location: Some("Eugene".to_string()),
                ..Default::default()
            },
        )
        .await?;

    let uploads = UploadService::new(
        LocalStorage::new(store.path().to_string_lossy().to_string()),
        SnapshotSource::from_file(file.path()).await?,
    );
    let form = PalindromeForm {
        license_plate: "STATS".to_string(),
        collector_id: collector.id.clone(),
        image: Some(ImageUpload {
            file_name: "stats.webp".to_string(),
            content_type: "image/webp".to_string(),
            bytes: vec![5; 8],
        }),
        ..Default::default()
    };
    catalog.create_palindrome(&uploads, Some("u-admin"), form).await?;
    catalog.delete_palindrome(Some("u-admin"), "p2").await?;

    let reloaded = Catalog::new(SnapshotSource::from_file(file.path()).await?);
    let (_, stats) = reloaded.collector_stats(&collector.id).await?;
    assert_eq!(stats.total_finds, 1);
    let (_, maya) = reloaded.collector_stats("c1").await?;
    assert_eq!(maya.total_finds, 1);

    let denied = reloaded.delete_collector(Some("u-viewer"), "c1").await;
    assert_eq!(denied.unwrap_err().status_code(), 403);
    Ok(())
}
