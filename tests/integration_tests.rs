use httpmock::prelude::*;
use launch_analytics::config::{parse_proximity, DEFAULT_PROXIMITY};
use launch_analytics::{CliConfig, EtlEngine, EtlError, LaunchPipeline, LocalStorage, TomlConfig};
use std::io::Read;
use tempfile::TempDir;

const GEO_CSV: &str = "\
Flight Number,Date,Launch Site,Payload Mass (kg),class,Lat,Long
1,2010-06-04,CCAFS LC-40,0.0,0,28.56230197,-80.57735648
2,2010-12-08,CCAFS LC-40,0.0,0,28.56230197,-80.57735648
3,2012-05-22,CCAFS LC-40,525.0,0,28.56230197,-80.57735648
4,2013-09-29,VAFB SLC-4E,500.0,0,34.63283416,-120.6107455
5,2017-02-19,KSC LC-39A,2490.0,1,28.57325457,-80.64689529
6,2017-03-16,KSC LC-39A,5600.0,1,28.57325457,-80.64689529
7,2017-05-01,CCAFS SLC-40,3669.0,1,28.56319718,-80.57682003
";

fn cli_config(dataset_url: String, output_path: String) -> CliConfig {
    CliConfig {
        dataset_url,
        output_path,
        site: "ALL".to_string(),
        payload_min: None,
        payload_max: None,
        proximities: vec![parse_proximity(DEFAULT_PROXIMITY).unwrap()],
        strict_coordinates: false,
        timeout_seconds: Some(10),
        json_logs: false,
        verbose: false,
        monitor: false,
    }
}

fn read_entry(archive: &mut zip::ZipArchive<std::io::Cursor<Vec<u8>>>, name: &str) -> String {
    let mut content = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    content
}

fn open_archive(path: &std::path::Path) -> zip::ZipArchive<std::io::Cursor<Vec<u8>>> {
    let data = std::fs::read(path).unwrap();
    zip::ZipArchive::new(std::io::Cursor::new(data)).unwrap()
}

#[tokio::test]
async fn test_end_to_end_report_with_cli_config() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/spacex_launch_geo.csv");
        then.status(200)
            .header("Content-Type", "text/csv")
            .body(GEO_CSV);
    });

    let config = cli_config(server.url("/spacex_launch_geo.csv"), output_path.clone());
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = LaunchPipeline::new(storage, config);
    let engine = EtlEngine::new(pipeline);

    let result = engine.run().await.unwrap();

    api_mock.assert();
    assert!(result.ends_with("launch_report.zip"));

    let mut archive = open_archive(&temp_dir.path().join("launch_report.zip"));

    let sites = read_entry(&mut archive, "launch_sites.csv");
    let lines: Vec<&str> = sites.lines().collect();
    assert_eq!(lines[0], "site,latitude,longitude,success,failure");
    assert_eq!(lines.len(), 5); // header + 4 sites
    assert!(lines[1].starts_with("CCAFS LC-40,28.56230197,-80.57735648,0,3"));

    let distances = read_entry(&mut archive, "proximity_distances.csv");
    let row = distances.lines().nth(1).unwrap();
    assert!(row.starts_with("CCAFS LC-40,Coastline,"));
    assert!(row.contains(",0.93,"), "row: {}", row);

    let report: serde_json::Value =
        serde_json::from_str(&read_entry(&mut archive, "report.json")).unwrap();
    assert_eq!(report["record_count"], 7);
    assert_eq!(report["selection"], "ALL");
    assert_eq!(report["overall_outcomes"]["success"], 3);
    assert_eq!(report["overall_outcomes"]["failure"], 4);
    assert_eq!(report["breakdown"]["kind"], "by_site");
    assert_eq!(report["breakdown"]["counts"]["KSC LC-39A"], 2);
}

#[tokio::test]
async fn test_end_to_end_single_site_payload_window() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/geo.csv");
        then.status(200).body(GEO_CSV);
    });

    let mut config = cli_config(server.url("/geo.csv"), output_path.clone());
    config.site = "KSC LC-39A".to_string();
    config.payload_min = Some(0.0);
    config.payload_max = Some(5000.0);

    let pipeline = LaunchPipeline::new(LocalStorage::new(output_path.clone()), config);
    EtlEngine::new(pipeline).run().await.unwrap();

    let mut archive = open_archive(&temp_dir.path().join("launch_report.zip"));

    let breakdown = read_entry(&mut archive, "outcome_counts.csv");
    assert_eq!(breakdown, "label,count\nFailure,0\nSuccess,2\n");

    let scatter = read_entry(&mut archive, "payload_scatter.csv");
    let rows: Vec<&str> = scatter.lines().skip(1).collect();
    assert_eq!(rows, vec!["KSC LC-39A,2490.0,1,"]);
}

#[tokio::test]
async fn test_dataset_failure_stops_the_run() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/failed.csv");
        then.status(500);
    });

    let config = cli_config(server.url("/failed.csv"), output_path.clone());
    let pipeline = LaunchPipeline::new(LocalStorage::new(output_path.clone()), config);
    let engine = EtlEngine::new_with_monitoring(pipeline, true);

    let err = engine.run().await.unwrap_err();

    // fetched exactly once, nothing written
    api_mock.assert_hits(1);
    assert!(matches!(err, EtlError::ApiError(_)));
    assert!(!temp_dir.path().join("launch_report.zip").exists());
}

#[tokio::test]
async fn test_end_to_end_with_toml_config() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/dash.csv");
        then.status(200).body(GEO_CSV);
    });

    let toml_content = format!(
        r#"
[report]
name = "toml-run"

[source]
url = "{}"

[analysis]
site = "CCAFS LC-40"

[[proximities]]
name = "Coastline"
site = "CCAFS LC-40"
latitude = 28.56260
longitude = -80.56786

[[proximities]]
name = "Lost"
site = "Nowhere"
latitude = 0.0
longitude = 0.0

[load]
output_path = "{}"
archive_filename = "ccafs.zip"
"#,
        server.url("/dash.csv"),
        output_path.replace('\\', "/")
    );

    let config = TomlConfig::from_toml_str(&toml_content).unwrap();
    let pipeline = LaunchPipeline::new(LocalStorage::new(output_path.clone()), config);
    let result = EtlEngine::new(pipeline).run().await.unwrap();

    api_mock.assert();
    assert!(result.ends_with("ccafs.zip"));

    let mut archive = open_archive(&temp_dir.path().join("ccafs.zip"));
    let distances = read_entry(&mut archive, "proximity_distances.csv");
    // unknown site skipped
    assert_eq!(distances.lines().count(), 2);

    let breakdown = read_entry(&mut archive, "outcome_counts.csv");
    assert_eq!(breakdown, "label,count\nFailure,3\nSuccess,0\n");
}
