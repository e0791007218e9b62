//! Integration tests for the harvester
//!
//! These tests use wiremock to serve a small gallery over HTTP and run the
//! full harvest cycle end-to-end, down to the CSV file on disk.

use album_harvest::config::Config;
use album_harvest::crawler::harvest;
use album_harvest::output::digest_file;
use album_harvest::{FetchError, HarvestError};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HEADER: &str = "itemId,family,scientificName,fileName,imageThumbnailUrl,description\r\n";

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, csv_path: &Path) -> Config {
    let mut config = Config::default();
    config.site.base_url = format!("{}/", base_url);
    config.fetch.timeout_secs = 5;
    config.output.csv_path = csv_path.display().to_string();
    config
}

/// (alt, href, src)
fn album_page(title: &str, albums: &[(&str, &str, &str)], next: Option<&str>) -> String {
    let cells: String = albums
        .iter()
        .map(|(alt, href, src)| {
            format!(
                r#"<td class="giAlbumCell"><div><a href="{}"><img src="{}" alt="{}"></a></div></td>"#,
                href, src, alt
            )
        })
        .collect();
    let next = next
        .map(|href| {
            format!(
                r#"<div class="next-and-last"><a class="next" href="{}">next</a></div>"#,
                href
            )
        })
        .unwrap_or_default();
    format!(
        "<html><head><title>{}</title></head><body><table><tr>{}</tr></table>{}</body></html>",
        title, cells, next
    )
}

/// (description, src, alt)
fn item_page(title: &str, items: &[(&str, &str, &str)]) -> String {
    let cells: String = items
        .iter()
        .map(|(description, src, alt)| {
            format!(
                r#"<td class="giItemCell"><div><a href="v/item"><img src="{}" alt="{}"></a></div><div class="giDescription2">{}</div></td>"#,
                src, alt, description
            )
        })
        .collect();
    format!(
        "<html><head><title>{}</title></head><body><table><tr>{}</tr></table></body></html>",
        title, cells
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_harvest_writes_csv() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let csv_path = temp_dir.path().join("out.csv");

    mount_page(
        &mock_server,
        "/main.php",
        album_page(
            "Gallery",
            &[("Noctuidae", "album1.php?id=12345_x", "t/noct.jpg")],
            None,
        ),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/album1.php"))
        .and(query_param("id", "12345_x"))
        .respond_with(html(item_page(
            "Agrotis infusa",
            &[
                ("<p>Bogong moth</p>", "d/1-2/a.jpg", "a.jpg"),
                ("<p>Common cutworm, adult</p>", "d/2-2/b.jpg", "b.jpg"),
            ],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), &csv_path);
    let stats = harvest(&config).await.expect("Harvest failed");

    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.records_emitted, 2);

    let csv = std::fs::read_to_string(&csv_path).expect("Failed to read CSV");
    let expected = format!(
        "{}{}{}",
        HEADER,
        ",|Noctuidae,Agrotis infusa,a.jpg,d/1-2/a.jpg,<p>Bogong moth</p>\r\n",
        ",|Noctuidae,Agrotis infusa,b.jpg,d/2-2/b.jpg,\"<p>Common cutworm, adult</p>\"\r\n",
    );
    assert_eq!(csv, expected);
}

#[tokio::test]
async fn test_redirect_to_home_emits_placeholder() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let csv_path = temp_dir.path().join("out.csv");

    mount_page(
        &mock_server,
        "/main.php",
        album_page(
            "Australian Moths Online",
            &[("Geometridae", "stale.php?g2_itemId=4211", "t/geo.jpg")],
            None,
        ),
    )
    .await;

    // A stale album link bounces back to the gallery home page
    Mock::given(method("GET"))
        .and(path("/stale.php"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/main.php"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), &csv_path);
    let stats = harvest(&config).await.expect("Harvest failed");

    assert_eq!(stats.placeholders, 1);
    assert_eq!(stats.records_emitted, 0);

    // "stale.php?g2_itemId=4211" is 24 chars, the id window is chars 15..20
    let csv = std::fs::read_to_string(&csv_path).expect("Failed to read CSV");
    assert_eq!(
        csv,
        format!(
            "{}emId=,,Geometridae,missing,t/geo.jpg,missing\r\n",
            HEADER
        )
    );
}

#[tokio::test]
async fn test_pagination_link_followed_once() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let csv_path = temp_dir.path().join("out.csv");

    mount_page(
        &mock_server,
        "/main.php",
        album_page("Gallery", &[("A", "a.php", "")], Some("page2.php")),
    )
    .await;
    mount_page(
        &mock_server,
        "/a.php",
        item_page("A", &[("first", "a1.jpg", "a1.jpg")]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/page2.php"))
        .respond_with(html(album_page("Gallery", &[("B", "b.php", "")], None)))
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_page(
        &mock_server,
        "/b.php",
        item_page("B", &[("second", "b1.jpg", "b1.jpg")]),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), &csv_path);
    let stats = harvest(&config).await.expect("Harvest failed");

    assert_eq!(stats.pagination_pages, 1);

    let csv = std::fs::read_to_string(&csv_path).expect("Failed to read CSV");
    let rows: Vec<&str> = csv.split("\r\n").filter(|r| !r.is_empty()).collect();
    assert_eq!(rows.len(), 3);
    assert!(rows[1].starts_with(",|A,A,"));
    assert!(rows[2].starts_with(",|B,B,"));
}

#[tokio::test]
async fn test_lineage_three_levels_deep() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let csv_path = temp_dir.path().join("out.csv");

    mount_page(
        &mock_server,
        "/main.php",
        album_page("Gallery", &[("Noctuidae", "family.php", "")], None),
    )
    .await;
    mount_page(
        &mock_server,
        "/family.php",
        album_page("Noctuidae", &[("Agrotis", "genus.php", "")], None),
    )
    .await;
    mount_page(
        &mock_server,
        "/genus.php",
        album_page("Agrotis", &[("Agrotis infusa", "species.php", "")], None),
    )
    .await;
    mount_page(
        &mock_server,
        "/species.php",
        item_page("Agrotis infusa (Boisduval, 1832)", &[("d", "x.jpg", "x.jpg")]),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), &csv_path);
    harvest(&config).await.expect("Harvest failed");

    let csv = std::fs::read_to_string(&csv_path).expect("Failed to read CSV");
    assert_eq!(
        csv,
        format!(
            "{},|Noctuidae|Agrotis|Agrotis infusa,\"Agrotis infusa (Boisduval, 1832)\",x.jpg,x.jpg,d\r\n",
            HEADER
        )
    );
}

#[tokio::test]
async fn test_server_error_aborts_but_keeps_written_rows() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let csv_path = temp_dir.path().join("out.csv");

    mount_page(
        &mock_server,
        "/main.php",
        album_page(
            "Gallery",
            &[("A", "a.php", ""), ("B", "b.php", ""), ("C", "c.php", "")],
            None,
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/a.php",
        item_page("A", &[("kept", "a1.jpg", "a1.jpg")]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/b.php"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/c.php"))
        .respond_with(html(item_page("C", &[("never", "c1.jpg", "c1.jpg")])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), &csv_path);
    let result = harvest(&config).await;

    match result {
        Err(HarvestError::Fetch(FetchError::Status { status, url })) => {
            assert_eq!(status, 500);
            assert!(url.ends_with("/b.php"));
        }
        other => panic!("Expected a status error, got {:?}", other),
    }

    let csv = std::fs::read_to_string(&csv_path).expect("Failed to read CSV");
    assert_eq!(csv, format!("{},|A,A,a1.jpg,a1.jpg,kept\r\n", HEADER));
}

#[tokio::test]
async fn test_repeated_harvests_are_byte_identical() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    mount_page(
        &mock_server,
        "/main.php",
        album_page(
            "Gallery",
            &[("A", "a.php", "t/a.jpg"), ("B", "b.php", "t/b.jpg")],
            Some("page2.php"),
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/a.php",
        item_page("A", &[("one", "1.jpg", "1.jpg"), ("two", "2.jpg", "2.jpg")]),
    )
    .await;
    mount_page(
        &mock_server,
        "/b.php",
        album_page("Australian Moths Online", &[], None),
    )
    .await;
    mount_page(
        &mock_server,
        "/page2.php",
        album_page("Gallery", &[("C", "c.php", "")], None),
    )
    .await;
    mount_page(
        &mock_server,
        "/c.php",
        item_page("C", &[("three", "3.jpg", "3.jpg")]),
    )
    .await;

    let first_path = temp_dir.path().join("first.csv");
    let second_path = temp_dir.path().join("second.csv");

    let first = harvest(&create_test_config(&mock_server.uri(), &first_path))
        .await
        .expect("First harvest failed");
    let second = harvest(&create_test_config(&mock_server.uri(), &second_path))
        .await
        .expect("Second harvest failed");

    assert_eq!(first, second);
    assert_eq!(first.placeholders, 1);
    assert_eq!(
        digest_file(&first_path).expect("Failed to digest first CSV"),
        digest_file(&second_path).expect("Failed to digest second CSV")
    );
}

#[tokio::test]
async fn test_unreachable_root_fails_with_header_only() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let csv_path = temp_dir.path().join("out.csv");

    Mock::given(method("GET"))
        .and(path("/main.php"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), &csv_path);
    let result = harvest(&config).await;

    assert!(matches!(
        result,
        Err(HarvestError::Fetch(FetchError::Status { status: 404, .. }))
    ));
    let csv = std::fs::read_to_string(&csv_path).expect("Failed to read CSV");
    assert_eq!(csv, HEADER);
}

#[tokio::test]
async fn test_slow_page_times_out() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let csv_path = temp_dir.path().join("out.csv");

    Mock::given(method("GET"))
        .and(path("/main.php"))
        .respond_with(
            html(album_page("Gallery", &[("A", "a.php", "")], None))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), &csv_path);
    config.fetch.timeout_secs = 1;
    let result = harvest(&config).await;

    match result {
        Err(HarvestError::Fetch(FetchError::Timeout { url })) => {
            assert!(url.ends_with("/main.php"));
        }
        other => panic!("Expected a timeout, got {:?}", other),
    }

    let csv = std::fs::read_to_string(&csv_path).expect("Failed to read CSV");
    assert_eq!(csv, HEADER);
}
