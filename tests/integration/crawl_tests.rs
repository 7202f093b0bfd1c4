//! Integration tests for the harvester
//!
//! These tests use wiremock to serve listing and detail pages and drive
//! the full harvest end-to-end.

use std::time::Duration;
use tally_harvest::config::Config;
use tally_harvest::crawler::Coordinator;
use tally_harvest::output::{write_dataset, DelimitedWriter};
use tally_harvest::HarvestError;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Listing page with one row per `(code, name)`
fn listing_page(entries: &[(&str, &str)]) -> String {
    let rows: String = entries
        .iter()
        .map(|(code, name)| {
            format!(
                r#"<tr>
                    <td class="cislo"><a href="ps311?xjazyk=CZ&amp;xobec={code}">{code}</a></td>
                    <td class="overflow_name">{name}</td>
                    <td class="center"><a href="ps34?xjazyk=CZ&amp;xobec={code}">X</a></td>
                </tr>"#
            )
        })
        .collect();

    format!(
        r#"<html><head><title>Výsledky hlasování za územní celky</title></head><body>
        <a href="ps2?xjazyk=CZ">Zpět</a>
        <table class="table">
            <tr><th>Obec číslo</th><th>Název</th><th>Výběr okrsku</th></tr>
            {rows}
        </table></body></html>"#
    )
}

/// Detail page with a summary table and a party table
fn detail_page(registered: &str, envelopes: &str, valid: &str, parties: &[(&str, &str)]) -> String {
    let rows: String = parties
        .iter()
        .enumerate()
        .map(|(i, (party, votes))| {
            format!(
                r#"<tr><td class="cislo">{}</td><td class="overflow_name">{party}</td>
                   <td class="cislo">{votes}</td><td class="cislo">1,00</td></tr>"#,
                i + 1
            )
        })
        .collect();

    format!(
        r#"<html><body>
        <table id="ps311_t1">
            <tr><th id="sa1">Okrsky</th><th id="sa2">Voliči v seznamu</th></tr>
            <tr>
                <td class="cislo" headers="sa1 sb1">100,00</td>
                <td class="cislo" headers="sa2">{registered}</td>
                <td class="cislo" headers="sa3">{envelopes}</td>
                <td class="cislo" headers="sa4">70,73</td>
                <td class="cislo" headers="sa5">{envelopes}</td>
                <td class="cislo" headers="sa6">{valid}</td>
                <td class="cislo" headers="sa7">99,31</td>
            </tr>
        </table>
        <table class="table">
            <tr><th>Strana číslo</th><th>Název</th><th>celkem</th><th>v %</th></tr>
            {rows}
            <tr><td>Celkem</td><td></td><td>144</td><td>100</td></tr>
        </table>
        </body></html>"#
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

async fn mount_listing(server: &MockServer, entries: &[(&str, &str)]) {
    Mock::given(method("GET"))
        .and(path("/district/ps32"))
        .respond_with(html(listing_page(entries)))
        .mount(server)
        .await;
}

async fn mount_detail(server: &MockServer, code: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/district/ps311"))
        .and(query_param("xobec", code))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

fn listing_url(server: &MockServer) -> String {
    format!("{}/district/ps32?xjazyk=CZ&xkraj=12&xnumnuts=7103", server.uri())
}

fn coordinator(concurrency: usize) -> Coordinator {
    let mut config = Config::default();
    config.crawler.max_concurrent_fetches = concurrency;
    Coordinator::new(config).expect("Failed to create coordinator")
}

#[tokio::test]
async fn test_two_municipalities_end_to_end() {
    let server = MockServer::start().await;
    mount_listing(&server, &[("101", "Alojzov"), ("102", "Bedihošť")]).await;
    mount_detail(
        &server,
        "101",
        html(detail_page("205", "145", "144", &[("ODS", "29"), ("ANO", "40")])),
    )
    .await;
    mount_detail(
        &server,
        "102",
        html(detail_page("1\u{a0}205", "845", "1,041", &[("ODS", "100"), ("ANO", "941")])),
    )
    .await;

    let harvest = coordinator(1)
        .run(&listing_url(&server))
        .await
        .expect("Harvest failed");
    let dataset = &harvest.dataset;

    assert_eq!(
        dataset.header(),
        vec!["code", "location", "registered", "envelopes", "valid", "ODS", "ANO"]
    );
    assert_eq!(dataset.len(), 2);

    let first = &dataset.rows()[0];
    assert_eq!(first.code, 101);
    assert_eq!(first.name, "Alojzov");
    assert_eq!(first.summary.registered, 205);
    assert_eq!(first.summary.envelopes_issued, 145);
    assert_eq!(first.summary.valid_count, 144);
    assert_eq!(first.counts, vec![29, 40]);

    let second = &dataset.rows()[1];
    assert_eq!(second.code, 102);
    assert_eq!(second.summary.registered, 1205);
    assert_eq!(second.summary.valid_count, 1041);
    assert_eq!(second.counts, vec![100, 941]);

    assert_eq!(harvest.report.municipalities, 2);
    assert_eq!(harvest.report.categories, 2);
    assert_eq!(harvest.report.columns(), dataset.header().len());
    assert!(harvest.report.dropped.is_empty());
}

#[tokio::test]
async fn test_written_file_matches_dataset() {
    let server = MockServer::start().await;
    mount_listing(&server, &[("101", "Praha, hl. m.")]).await;
    mount_detail(
        &server,
        "101",
        html(detail_page("10", "9", "8", &[("A", "5"), ("B", "3")])),
    )
    .await;

    let harvest = coordinator(1).run(&listing_url(&server)).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("results.csv");
    write_dataset(&DelimitedWriter::new(',', false), &out, &harvest.dataset).unwrap();

    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "code,location,registered,envelopes,valid,A,B\r\n101,\"Praha, hl. m.\",10,9,8,5,3\r\n"
    );
}

#[tokio::test]
async fn test_schema_fixed_by_first_municipality() {
    let server = MockServer::start().await;
    mount_listing(&server, &[("101", "One"), ("102", "Two")]).await;
    mount_detail(
        &server,
        "101",
        html(detail_page("10", "9", "8", &[("A", "5"), ("B", "3")])),
    )
    .await;
    mount_detail(
        &server,
        "102",
        html(detail_page("10", "9", "8", &[("Z", "9"), ("A", "4")])),
    )
    .await;

    let harvest = coordinator(1).run(&listing_url(&server)).await.unwrap();

    assert_eq!(harvest.dataset.schema().categories(), ["A", "B"]);
    assert_eq!(harvest.dataset.rows()[1].counts, vec![4, 0]);

    assert_eq!(harvest.report.dropped.len(), 1);
    assert_eq!(harvest.report.dropped[0].code, 102);
    assert_eq!(harvest.report.dropped[0].categories, vec!["Z".to_string()]);
}

#[tokio::test]
async fn test_no_municipalities_found() {
    let server = MockServer::start().await;
    mount_listing(&server, &[]).await;

    let err = coordinator(1).run(&listing_url(&server)).await.unwrap_err();
    assert!(matches!(err, HarvestError::NoSubEntities { .. }));
}

#[tokio::test]
async fn test_listing_fetch_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/district/ps32"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = coordinator(1).run(&listing_url(&server)).await.unwrap_err();
    assert!(matches!(err, HarvestError::HttpStatus { status: 503, .. }));
}

#[tokio::test]
async fn test_second_detail_failure_aborts_run() {
    let server = MockServer::start().await;
    mount_listing(&server, &[("101", "One"), ("102", "Two"), ("103", "Three")]).await;
    mount_detail(
        &server,
        "101",
        html(detail_page("10", "9", "8", &[("A", "5")])),
    )
    .await;
    mount_detail(&server, "102", ResponseTemplate::new(500)).await;

    // Never requested: the run stops at the first failure
    Mock::given(method("GET"))
        .and(path("/district/ps311"))
        .and(query_param("xobec", "103"))
        .respond_with(html(detail_page("1", "1", "1", &[("A", "1")])))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("results.csv");

    let result = coordinator(1).run(&listing_url(&server)).await;
    if let Ok(harvest) = &result {
        write_dataset(&DelimitedWriter::default(), &out, &harvest.dataset).unwrap();
    }

    match result.unwrap_err() {
        HarvestError::Page { code, source, .. } => {
            assert_eq!(code, 102);
            assert!(matches!(*source, HarvestError::HttpStatus { status: 500, .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!out.exists());
}

#[tokio::test]
async fn test_missing_summary_field_aborts_run() {
    let server = MockServer::start().await;
    mount_listing(&server, &[("101", "One")]).await;
    let body = detail_page("10", "9", "8", &[("A", "5")]).replace(r#"headers="sa3""#, "");
    mount_detail(&server, "101", html(body)).await;

    let err = coordinator(1).run(&listing_url(&server)).await.unwrap_err();
    match err {
        HarvestError::Page { source, .. } => {
            assert!(matches!(
                *source,
                HarvestError::MissingField { field: "envelopes", .. }
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_page_without_tallies_aborts_run() {
    let server = MockServer::start().await;
    mount_listing(&server, &[("101", "One")]).await;
    mount_detail(&server, "101", html(detail_page("10", "9", "8", &[]))).await;

    let err = coordinator(1).run(&listing_url(&server)).await.unwrap_err();
    assert!(err.to_string().contains("No party vote results"));
}

#[tokio::test]
async fn test_concurrent_fetches_keep_listing_order() {
    let server = MockServer::start().await;
    mount_listing(&server, &[("101", "Slow"), ("102", "Fast"), ("103", "Faster")]).await;
    mount_detail(
        &server,
        "101",
        html(detail_page("1", "1", "1", &[("A", "1"), ("B", "2")]))
            .set_delay(Duration::from_millis(300)),
    )
    .await;
    mount_detail(
        &server,
        "102",
        html(detail_page("2", "2", "2", &[("C", "7"), ("B", "3")])),
    )
    .await;
    mount_detail(
        &server,
        "103",
        html(detail_page("3", "3", "3", &[("A", "4")])),
    )
    .await;

    let harvest = coordinator(3).run(&listing_url(&server)).await.unwrap();
    let codes: Vec<u32> = harvest.dataset.rows().iter().map(|r| r.code).collect();

    assert_eq!(codes, vec![101, 102, 103]);
    assert_eq!(harvest.dataset.schema().categories(), ["A", "B"]);
    assert_eq!(harvest.dataset.rows()[1].counts, vec![0, 3]);
    assert_eq!(harvest.dataset.rows()[2].counts, vec![4, 0]);
}

#[tokio::test]
async fn test_concurrent_fetch_failure_aborts_run() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        &[("101", "One"), ("102", "Two"), ("103", "Three"), ("104", "Four"), ("105", "Five")],
    )
    .await;

    // Window mates of the failing page may be cancelled mid-flight
    for code in ["101", "103"] {
        Mock::given(method("GET"))
            .and(path("/district/ps311"))
            .and(query_param("xobec", code))
            .respond_with(html(detail_page("1", "1", "1", &[("A", "1")])))
            .mount(&server)
            .await;
    }
    mount_detail(&server, "102", ResponseTemplate::new(500)).await;

    // The second window is never started
    for code in ["104", "105"] {
        Mock::given(method("GET"))
            .and(path("/district/ps311"))
            .and(query_param("xobec", code))
            .respond_with(html(detail_page("1", "1", "1", &[("A", "1")])))
            .expect(0)
            .mount(&server)
            .await;
    }

    let err = coordinator(3).run(&listing_url(&server)).await.unwrap_err();
    match err {
        HarvestError::Page { code, source, .. } => {
            assert_eq!(code, 102);
            assert!(matches!(*source, HarvestError::HttpStatus { status: 500, .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_listing_url_with_surrounding_whitespace() {
    let server = MockServer::start().await;
    mount_listing(&server, &[("101", "One")]).await;
    mount_detail(
        &server,
        "101",
        html(detail_page("10", "9", "8", &[("A", "5")])),
    )
    .await;

    let padded = format!("  {}\n", listing_url(&server));
    let harvest = coordinator(1).run(&padded).await.expect("Harvest failed");

    assert_eq!(harvest.dataset.len(), 1);
    assert_eq!(harvest.dataset.rows()[0].name, "One");
}

#[tokio::test]
async fn test_dry_run_discovery() {
    let server = MockServer::start().await;
    mount_listing(&server, &[("506761", "Alojzov")]).await;

    let entities = coordinator(1).discover(&listing_url(&server)).await.unwrap();
    assert_eq!(entities.len(), 1);
    assert_eq!(entities[0].code, 506761);
    assert_eq!(
        entities[0].detail_url,
        format!("{}/district/ps311?xjazyk=CZ&xobec=506761", server.uri())
    );
}
