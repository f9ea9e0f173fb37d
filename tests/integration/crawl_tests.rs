//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the wiki and the rating site and
//! run the full crawl cycle end-to-end, from a TOML config file to the CSV.

use kino_crawler::config::{load_config, Config};
use kino_crawler::crawler::crawl;
use std::io::Write;
use std::path::Path;
use tempfile::{NamedTempFile, TempDir};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HEADER: &str = "Название,Жанр,Режиссёр,Страна,Год,IMDB Rating";

/// Writes a config pointing at the mock wiki and loads it back
fn create_test_config(wiki: &MockServer, target: usize, concurrency: u32, csv: &Path) -> Config {
    let content = format!(
        r#"
[crawler]
target-records = {target}
concurrent-requests = {concurrency}
concurrent-requests-per-domain = {concurrency}
download-delay = 0
request-timeout = 5

[retry]
times = 2
http-codes = [503]
backoff = 10

[sites]
seeds = ["{wiki}/wiki/Category:Films"]
allowed-domains = ["127.0.0.1"]
rating-link = "/title/tt"

[output]
csv-path = "{csv}"
"#,
        wiki = wiki.uri(),
        csv = csv.display()
    );

    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write config");
    file.flush().expect("Failed to flush config");
    load_config(file.path()).expect("Failed to load config")
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html; charset=utf-8")
}

fn listing(items: &[&str], next: Option<&str>) -> ResponseTemplate {
    let links: String = items
        .iter()
        .map(|item| format!(r#"<li><a href="/wiki/{0}">{0}</a></li>"#, item))
        .collect();
    let next = next
        .map(|href| format!(r#"<a href="{}">Следующая страница</a>"#, href))
        .unwrap_or_default();
    html(format!(
        r#"<div id="mw-pages"><a href="/wiki/Prev">Предыдущая страница</a>{}
        <div class="mw-category-group"><h3>Б</h3><ul>{}</ul></div></div>"#,
        next, links
    ))
}

fn article(title: &str, genre: &str, year: &str, rating_href: Option<&str>) -> ResponseTemplate {
    let rating = rating_href
        .map(|href| format!(r#"<ul><li><a class="external" href="{}">IMDb</a></li></ul>"#, href))
        .unwrap_or_default();
    html(format!(
        r#"<table class="infobox">
            <tr><th class="infobox-above" colspan="2">{}</th></tr>
            <tr><th>Жанр</th><td>{}<sup>[1]</sup></td></tr>
            <tr><th>Режиссёр</th><td>Алексей Балабанов</td></tr>
            <tr><th>Страна</th><td><span>&nbsp;</span>Россия</td></tr>
            <tr><th>Год</th><td>{}</td></tr>
        </table>{}"#,
        title, genre, year, rating
    ))
}

async fn mount(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_across_two_sites() {
    let wiki = MockServer::start().await;
    let imdb = MockServer::start().await;
    let rated = format!("{}/title/tt0118767/", imdb.uri());
    let blocked = format!("{}/title/tt0079944/", imdb.uri());

    mount(
        &wiki,
        "/wiki/Category:Films",
        listing(&["Brat", "Brat2"], Some("/wiki/Category:Films/2")),
    )
    .await;
    mount(&wiki, "/wiki/Brat", article("Брат", "драма, криминал", "1997", Some(&rated))).await;
    mount(&wiki, "/wiki/Brat2", article("Брат 2", "боевик", "2000", None)).await;
    mount(&wiki, "/wiki/Stalker", article("Сталкер", "фантастика", "1979", Some(&blocked))).await;

    mount(&wiki, "/wiki/Category:Films/2", listing(&["Stalker"], None)).await;

    mount(
        &imdb,
        "/title/tt0118767/",
        html(
            r#"<title>Brother (1997) - IMDb</title>
            <div data-testid="hero-rating-bar__aggregate-rating__score"><span>7.8</span><span>/10</span></div>"#
                .to_string(),
        ),
    )
    .await;
    mount(
        &imdb,
        "/title/tt0079944/",
        html("<h1>Request blocked</h1>".to_string()),
    )
    .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let csv_path = dir.path().join("films.csv");
    let config = create_test_config(&wiki, 10, 2, &csv_path);

    let stats = crawl(&config).await.expect("Crawl failed");

    assert_eq!(stats.category_pages, 2);
    assert_eq!(stats.detail_pages, 3);
    assert_eq!(stats.rating_pages, 2);
    assert_eq!(stats.records_emitted, 2);
    assert_eq!(stats.chains_abandoned, 1);
    assert_eq!(stats.tasks_failed, 0);

    let content = std::fs::read_to_string(&csv_path).expect("Failed to read CSV");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], HEADER);
    assert_eq!(lines.len(), 3);
    assert!(lines.contains(&"Брат,\"драма, криминал\",Алексей Балабанов,Россия,1997,7.8"));
    assert!(lines.contains(&"Брат 2,боевик,Алексей Балабанов,Россия,2000,Not specified"));
    assert!(!content.contains("Сталкер"));
}

#[tokio::test]
async fn test_target_stops_pagination() {
    let wiki = MockServer::start().await;

    mount(
        &wiki,
        "/wiki/Category:Films",
        listing(&["A", "B", "C"], Some("/wiki/Category:Films/2")),
    )
    .await;
    mount(&wiki, "/wiki/A", article("А", "драма", "1991", None)).await;
    mount(&wiki, "/wiki/B", article("Б", "драма", "1992", None)).await;
    mount(&wiki, "/wiki/C", article("В", "драма", "1993", None)).await;

    Mock::given(method("GET"))
        .and(path("/wiki/Category:Films/2"))
        .respond_with(listing(&["D"], None))
        .expect(0)
        .mount(&wiki)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let csv_path = dir.path().join("films.csv");
    let config = create_test_config(&wiki, 1, 1, &csv_path);

    let stats = crawl(&config).await.expect("Crawl failed");

    assert_eq!(stats.records_emitted, 1);
    assert_eq!(stats.category_pages, 1);

    let content = std::fs::read_to_string(&csv_path).expect("Failed to read CSV");
    assert_eq!(content.lines().count(), 2);
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let wiki = MockServer::start().await;

    mount(&wiki, "/wiki/Category:Films", listing(&["A", "Gone"], None)).await;

    Mock::given(method("GET"))
        .and(path("/wiki/A"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&wiki)
        .await;
    mount(&wiki, "/wiki/A", article("А", "драма", "1991", None)).await;

    Mock::given(method("GET"))
        .and(path("/wiki/Gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&wiki)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let csv_path = dir.path().join("films.csv");
    let config = create_test_config(&wiki, 5, 2, &csv_path);

    let stats = crawl(&config).await.expect("Crawl failed");

    assert_eq!(stats.records_emitted, 1);
    assert_eq!(stats.tasks_failed, 1);
}

#[tokio::test]
async fn test_previous_output_is_replaced() {
    let wiki = MockServer::start().await;
    mount(&wiki, "/wiki/Category:Films", listing(&["A"], None)).await;
    mount(&wiki, "/wiki/A", article("А", "драма", "1991", None)).await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let csv_path = dir.path().join("films.csv");
    std::fs::write(&csv_path, "old,rows\n1,2\n3,4\n5,6\n").expect("Failed to seed CSV");
    let config = create_test_config(&wiki, 5, 1, &csv_path);

    crawl(&config).await.expect("Crawl failed");

    let content = std::fs::read_to_string(&csv_path).expect("Failed to read CSV");
    assert!(!content.contains("old"));
    assert_eq!(
        content.lines().collect::<Vec<_>>(),
        vec![HEADER, "А,драма,Алексей Балабанов,Россия,1991,Not specified"]
    );
}
