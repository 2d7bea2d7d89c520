//! Storage event endpoint integration tests: derivative generation end to end.
//!
//! Run with: `cargo test -p resizer-api --test storage_events_test`

mod helpers;

use helpers::fixtures;
use helpers::{setup_test_app, TestApp, DERIVATIVE_BUCKET, UPLOAD_BUCKET};
use image::ImageFormat;
use resizer_core::models::StorageEventNotification;
use resizer_storage::ObjectVisibility;
use serde_json::json;

async fn post_objects(app: &TestApp, objects: &[(&str, &str)]) -> axum_test::TestResponse {
    let notification = StorageEventNotification::for_objects(objects.iter().copied());
    app.client()
        .post("/events/storage")
        .json(&notification)
        .await
}

#[tokio::test]
async fn test_jpeg_derivatives_published() {
    let app = setup_test_app();
    app.uploads
        .put("photo.jpg", fixtures::jpeg(3000, 2000), "image/jpeg");

    let response = post_objects(&app, &[(UPLOAD_BUCKET, "photo.jpg")]).await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["records"][0]["status"], "published");
    assert_eq!(body["records"][0]["derivatives"].as_array().map(Vec::len), Some(2));

    assert_eq!(app.derivatives.keys(), ["photo-1000.jpg", "photo-200.jpg"]);

    let full = app.derivatives.get("photo-1000.jpg").expect("full size");
    assert_eq!(full.content_type, "image/jpeg");
    assert_eq!(full.visibility, ObjectVisibility::PublicRead);
    assert_eq!(fixtures::inspect(&full.data), (ImageFormat::Jpeg, 1000, 667));

    let thumb = app.derivatives.get("photo-200.jpg").expect("thumbnail");
    assert_eq!(thumb.content_type, "image/jpeg");
    assert_eq!(fixtures::inspect(&thumb.data), (ImageFormat::Jpeg, 200, 133));

    // The original is left in place
    assert!(app.uploads.get("photo.jpg").is_some());
    assert_eq!(app.scratch_entries(), 0);
}

#[tokio::test]
async fn test_png_and_gif_keep_their_format() {
    let app = setup_test_app();
    app.uploads.put("logo.png", fixtures::png(400, 1200), "image/png");
    app.uploads.put("anim.gif", fixtures::gif(600, 300), "image/gif");

    let response = post_objects(
        &app,
        &[(UPLOAD_BUCKET, "logo.png"), (UPLOAD_BUCKET, "anim.gif")],
    )
    .await;
    assert_eq!(response.status_code(), 200);

    let png_thumb = app.derivatives.get("logo-200.png").expect("png thumbnail");
    assert_eq!(png_thumb.content_type, "image/png");
    assert_eq!(fixtures::inspect(&png_thumb.data), (ImageFormat::Png, 67, 200));

    let png_full = app.derivatives.get("logo-1000.png").expect("png full size");
    assert_eq!(fixtures::inspect(&png_full.data), (ImageFormat::Png, 333, 1000));

    let gif_full = app.derivatives.get("anim-1000.gif").expect("gif full size");
    assert_eq!(gif_full.content_type, "image/gif");
    // Already within 1000px, so not enlarged
    assert_eq!(fixtures::inspect(&gif_full.data), (ImageFormat::Gif, 600, 300));

    let gif_thumb = app.derivatives.get("anim-200.gif").expect("gif thumbnail");
    assert_eq!(fixtures::inspect(&gif_thumb.data), (ImageFormat::Gif, 200, 100));
}

#[tokio::test]
async fn test_small_images_are_not_upscaled() {
    let app = setup_test_app();
    app.uploads.put("tiny.png", fixtures::png(150, 100), "image/png");

    let response = post_objects(&app, &[(UPLOAD_BUCKET, "tiny.png")]).await;
    assert_eq!(response.status_code(), 200);

    for key in ["tiny-1000.png", "tiny-200.png"] {
        let object = app.derivatives.get(key).expect("derivative");
        assert_eq!(fixtures::inspect(&object.data), (ImageFormat::Png, 150, 100));
    }
}

#[tokio::test]
async fn test_predicted_urls_match_published_urls() {
    let app = setup_test_app();

    let response = app
        .client()
        .get("/upload-url")
        .add_query_param("filename", "photo.jpg")
        .await;
    assert_eq!(response.status_code(), 200);
    let grant: serde_json::Value = response.json();
    let key = grant["key"].as_str().expect("key").to_string();

    // Client PUT through the signed URL
    app.uploads.put(&key, fixtures::jpeg(1600, 1200), "image/jpeg");

    let response = post_objects(&app, &[(UPLOAD_BUCKET, key.as_str())]).await;
    assert_eq!(response.status_code(), 200);
    let report: serde_json::Value = response.json();

    let urls: Vec<&str> = report["records"][0]["derivatives"]
        .as_array()
        .expect("derivatives")
        .iter()
        .map(|d| d["url"].as_str().expect("url"))
        .collect();
    assert_eq!(
        urls,
        [
            grant["full_url"].as_str().expect("full_url"),
            grant["thumbnail_url"].as_str().expect("thumbnail_url"),
        ]
    );
    assert_eq!(app.derivatives.keys().len(), 2);
    assert!(urls
        .iter()
        .all(|url| url.starts_with(&format!("https://{}.example.test/", DERIVATIVE_BUCKET))));
}

#[tokio::test]
async fn test_failing_record_does_not_block_the_rest() {
    let app = setup_test_app();
    app.uploads.put("photo.jpg", fixtures::jpeg(800, 600), "image/jpeg");

    let response = post_objects(
        &app,
        &[(UPLOAD_BUCKET, "missing.jpg"), (UPLOAD_BUCKET, "photo.jpg")],
    )
    .await;

    assert_eq!(response.status_code(), 502);
    let body: serde_json::Value = response.json();
    assert_eq!(body["records"][0]["status"], "failed");
    assert_eq!(body["records"][0]["error"]["code"], "FETCH_ERROR");
    assert_eq!(body["records"][1]["status"], "published");

    assert_eq!(app.derivatives.keys(), ["photo-1000.jpg", "photo-200.jpg"]);
}

#[tokio::test]
async fn test_undecodable_source_publishes_nothing() {
    let app = setup_test_app();
    app.uploads
        .put("broken.jpg", b"definitely not a jpeg".to_vec(), "image/jpeg");

    let response = post_objects(&app, &[(UPLOAD_BUCKET, "broken.jpg")]).await;

    assert_eq!(response.status_code(), 422);
    let body: serde_json::Value = response.json();
    assert_eq!(body["records"][0]["error"]["code"], "DECODE_ERROR");
    assert!(app.derivatives.keys().is_empty());
    assert_eq!(app.scratch_entries(), 0);
}

#[tokio::test]
async fn test_unsupported_extension_is_rejected_before_download() {
    let app = setup_test_app();
    app.uploads.put("report.pdf", b"%PDF-1.4".to_vec(), "application/pdf");

    let response = post_objects(&app, &[(UPLOAD_BUCKET, "report.pdf")]).await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["records"][0]["error"]["code"], "VALIDATION_ERROR");
    assert!(app.derivatives.keys().is_empty());
}

#[tokio::test]
async fn test_publish_failure_is_reported() {
    let app = setup_test_app();
    app.uploads.put("photo.jpg", fixtures::jpeg(400, 300), "image/jpeg");
    app.derivatives.fail_uploads(true);

    let response = post_objects(&app, &[(UPLOAD_BUCKET, "photo.jpg")]).await;

    assert_eq!(response.status_code(), 502);
    let body: serde_json::Value = response.json();
    assert_eq!(body["records"][0]["error"]["code"], "PUBLISH_ERROR");
    assert_eq!(app.scratch_entries(), 0);
}

#[tokio::test]
async fn test_scratch_root_is_empty_after_mixed_batch() {
    let app = setup_test_app();
    app.uploads.put("good.png", fixtures::png(500, 500), "image/png");
    app.uploads
        .put("bad.png", b"not a png either".to_vec(), "image/png");

    let response = post_objects(
        &app,
        &[(UPLOAD_BUCKET, "good.png"), (UPLOAD_BUCKET, "bad.png")],
    )
    .await;

    assert_eq!(response.status_code(), 422);
    let body: serde_json::Value = response.json();
    assert_eq!(body["records"][0]["status"], "published");
    assert_eq!(body["records"][1]["error"]["code"], "DECODE_ERROR");
    assert_eq!(app.scratch_entries(), 0);
}

#[tokio::test]
async fn test_reported_oversize_is_rejected_before_download() {
    let app = setup_test_app();

    // Not in the bucket: a download attempt would fail with FETCH_ERROR
    let response = app
        .client()
        .post("/events/storage")
        .json(&json!({
            "Records": [{
                "eventName": "ObjectCreated:Put",
                "s3": {
                    "bucket": { "name": UPLOAD_BUCKET },
                    "object": { "key": "huge.jpg", "size": 30_000_000u64 }
                }
            }]
        }))
        .await;

    assert_eq!(response.status_code(), 422);
    let body: serde_json::Value = response.json();
    assert_eq!(body["records"][0]["status"], "failed");
    assert_eq!(body["records"][0]["error"]["code"], "DECODE_ERROR");
    assert!(app.derivatives.keys().is_empty());
    assert_eq!(app.scratch_entries(), 0);
}

#[tokio::test]
async fn test_reprocessing_overwrites_derivatives() {
    let app = setup_test_app();
    app.uploads.put("photo.jpg", fixtures::jpeg(1200, 1200), "image/jpeg");

    for _ in 0..2 {
        let response = post_objects(&app, &[(UPLOAD_BUCKET, "photo.jpg")]).await;
        assert_eq!(response.status_code(), 200);
    }

    assert_eq!(app.derivatives.keys(), ["photo-1000.jpg", "photo-200.jpg"]);
}

#[tokio::test]
async fn test_encoded_key_with_spaces() {
    let app = setup_test_app();
    app.uploads
        .put("summer trip.jpg", fixtures::jpeg(300, 300), "image/jpeg");

    let response = app
        .client()
        .post("/events/storage")
        .json(&json!({
            "Records": [{
                "eventName": "ObjectCreated:Put",
                "s3": {
                    "bucket": { "name": UPLOAD_BUCKET },
                    "object": { "key": "summer+trip.jpg", "size": 1234 }
                }
            }]
        }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["records"][0]["key"], "summer trip.jpg");
    assert!(app.derivatives.get("summer trip-200.jpg").is_some());
}

#[tokio::test]
async fn test_dotted_basename_is_processed() {
    let app = setup_test_app();
    app.uploads
        .put("my..photo.jpg", fixtures::jpeg(300, 200), "image/jpeg");

    let response = post_objects(&app, &[(UPLOAD_BUCKET, "my..photo.jpg")]).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(
        app.derivatives.keys(),
        ["my..photo-1000.jpg", "my..photo-200.jpg"]
    );
}

#[tokio::test]
async fn test_event_for_other_bucket_is_rejected() {
    let app = setup_test_app();
    app.uploads.put("photo.jpg", fixtures::jpeg(300, 300), "image/jpeg");

    let response = post_objects(&app, &[(DERIVATIVE_BUCKET, "photo.jpg")]).await;

    assert_eq!(response.status_code(), 400);
    assert!(app.derivatives.keys().is_empty());
}

#[tokio::test]
async fn test_non_create_events_are_skipped() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/events/storage")
        .json(&json!({
            "Records": [{
                "eventName": "ObjectRemoved:Delete",
                "s3": {
                    "bucket": { "name": UPLOAD_BUCKET },
                    "object": { "key": "photo.jpg" }
                }
            }]
        }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["records"][0]["status"], "skipped");
    assert!(app.derivatives.keys().is_empty());
}

#[tokio::test]
async fn test_empty_notification() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/events/storage")
        .json(&json!({ "Records": [] }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["records"], json!([]));
}

#[tokio::test]
async fn test_malformed_notification() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/events/storage")
        .json(&json!({ "Records": [{ "s3": "nope" }] }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "BAD_REQUEST");
}
