use chrono::{Local, NaiveDate, NaiveTime, TimeZone};
use secrecy::SecretString;
use strava_bulk::cli::RunOptions;
use strava_bulk::config::Configuration;
use strava_bulk::export;
use strava_client::http_client::ReqwestStravaClient;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn configuration() -> Configuration {
    Configuration::from_json_str(
        r#"{
            "templates": {},
            "activities_export": {
                "columns": [
                    {"field": "name", "default": "unnamed"},
                    {"field": "distance", "label": "distance_km", "default": "0", "filter": "meters_to_km"},
                    {"field": "moving_time", "label": "duration", "default": "0", "filter": "seconds_to_hms"}
                ],
                "column_separator": ";",
                "row_separator": "\n"
            }
        }"#,
    )
    .unwrap()
}

fn options(start: NaiveDate, end: NaiveDate) -> RunOptions {
    RunOptions {
        start,
        end,
        ignore_week_end: false,
        except: None,
        simulate: false,
    }
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[tokio::test]
async fn export_writes_projected_csv_after_successful_fetch() {
    let server = MockServer::start().await;
    let body = serde_json::json!([
        {"id": 1, "name": "Ride", "distance": 1234, "moving_time": 3661},
        {"id": 2, "distance": 0, "moving_time": 60}
    ]);
    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = ReqwestStravaClient::new(&server.uri(), SecretString::new("tok".into()));
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("export.csv");

    let content = export::run(
        &client,
        &configuration(),
        &options(d(2016, 10, 3), d(2016, 10, 10)),
        Some(&file),
    )
    .await
    .expect("export");

    let expected = "name;distance_km;duration\nRide;1.23;01:01:01\nunnamed;0.00;00:01:00\n";
    assert_eq!(content, expected);
    assert_eq!(std::fs::read_to_string(&file).unwrap(), expected);
}

#[tokio::test]
async fn export_sends_day_resolution_unix_bounds() {
    let server = MockServer::start().await;

    let start = d(2016, 10, 3);
    let end = d(2016, 10, 10);
    let after = Local
        .from_local_datetime(&start.and_time(NaiveTime::MIN))
        .unwrap()
        .timestamp();
    let before = Local
        .from_local_datetime(&end.and_time(NaiveTime::from_hms_opt(23, 59, 0).unwrap()))
        .unwrap()
        .timestamp();

    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .and(query_param("after", after.to_string()))
        .and(query_param("before", before.to_string()))
        .and(query_param("page", "0"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let client = ReqwestStravaClient::new(&server.uri(), SecretString::new("tok".into()));
    let content = export::run(&client, &configuration(), &options(start, end), None)
        .await
        .expect("export");
    assert_eq!(content, "name;distance_km;duration\n");
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn export_pages_until_short_page() {
    let server = MockServer::start().await;

    let full_page: Vec<serde_json::Value> = (0..100)
        .map(|i| serde_json::json!({"id": i, "name": format!("act-{i}"), "distance": 1000, "moving_time": 60}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&full_page))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 100, "name": "last", "distance": 1000, "moving_time": 60}
        ])))
        .mount(&server)
        .await;

    let client = ReqwestStravaClient::new(&server.uri(), SecretString::new("tok".into()));
    let content = export::run(
        &client,
        &configuration(),
        &options(d(2016, 10, 3), d(2016, 10, 10)),
        None,
    )
    .await
    .expect("export");

    // Header plus 101 data rows, each terminated by the row separator.
    assert_eq!(content.lines().count(), 102);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn failed_fetch_leaves_no_file_behind() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = ReqwestStravaClient::new(&server.uri(), SecretString::new("tok".into()));
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("export.csv");

    let res = export::run(
        &client,
        &configuration(),
        &options(d(2016, 10, 3), d(2016, 10, 10)),
        Some(&file),
    )
    .await;
    assert!(res.is_err());
    assert!(!file.exists(), "partial file written despite failed fetch");
}
