// ==========================================
// 导入API集成测试
// ==========================================
// 测试目标: 配置驱动的 webhook 导入 / 缺失配置 / 双管道互不影响 / 查询透传
// ==========================================

mod test_helpers;

use fleet_ops_import::api::{ApiError, PipelineResult};
use fleet_ops_import::app::AppState;
use fleet_ops_import::config::{config_keys, ConfigManager};
use fleet_ops_import::importer::open_file_source;
use fleet_ops_import::{Currency, ImportSummary};
use std::io::Write;

const TRIPS_BODY: &str = r#"[
    ["4H","Sipho","internal","Acme","L1","JHB-DBN","SHIPPED","2024-01-01","","DELIVERED","2024-01-03"],
    ["4H","Sipho","external","Acme","L2","JHB-DBN","SHIPPED","2024-01-02","","DELIVERED","2024-01-04"],
    ["4H","Sipho","internal","Acme","L1","JHB-DBN","SHIPPED","2024-01-01","","DELIVERED","2024-01-03"]
]"#;

const EVENTS_BODY: &str = r#"[
    ["2024-01-05T10:00:00Z","","Sipho","2024-01-05","10:00","speeding","4H","N1","high","resolved",5,1],
    ["","","Sipho","2024-01-05","11:00","UNKNOWN","4H","N1","","","",2]
]"#;

fn configure(db_path: &str, entries: &[(&str, &str)]) {
    let config = ConfigManager::new(db_path).unwrap();
    for (key, value) in entries {
        config.set_config_value(key, value).unwrap();
    }
}

#[tokio::test]
async fn test_trips_import_from_configured_webhook() {
    let stub = test_helpers::spawn_http_stub(200, TRIPS_BODY).await;
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
    configure(
        &db_path,
        &[
            (config_keys::TRIPS_WEBHOOK_URL, &*format!("{}/exec", stub.base_url)),
            (config_keys::SHEET_NAME, "Trips"),
            (config_keys::FETCH_TIMEOUT_MS, "5000"),
        ],
    );

    let state = AppState::new(db_path.clone()).await.unwrap();
    let report = state.import_api.import_trips_from_webhook().await.unwrap();

    assert_eq!(report.summary, ImportSummary { imported: 2, skipped: 1 });
    assert!(stub.request_lines()[0].contains("/exec?sheet=Trips"));

    let trips = state.import_api.list_trips().await.unwrap();
    assert_eq!(trips.len(), 2);
    assert!(trips
        .iter()
        .all(|t| t.import_source.as_deref() == Some(report.source_id.as_str())));
}

#[tokio::test]
async fn test_configured_mapping_defaults_are_applied() {
    let stub = test_helpers::spawn_http_stub(200, EVENTS_BODY).await;
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
    configure(
        &db_path,
        &[
            (
                config_keys::DRIVER_BEHAVIOR_WEBHOOK_URL,
                &*format!("{}/exec", stub.base_url),
            ),
            (config_keys::REPORTED_BY, "Ops Desk"),
            (config_keys::DEFAULT_CURRENCY, "USD"),
        ],
    );

    let state = AppState::new(db_path.clone()).await.unwrap();
    let report = state
        .import_api
        .import_driver_behavior_from_webhook()
        .await
        .unwrap();
    assert_eq!(report.summary, ImportSummary { imported: 1, skipped: 1 });

    let events = state.import_api.list_driver_behavior_events().await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].reported_by, "Ops Desk");
    assert_eq!(events[0].reported_at, "2024-01-05T10:00:00Z");
    assert_eq!(events[0].points, 5);
    assert_eq!(events[0].count, Some(1));

    // 币种默认值作用于行程
    let mut csv_file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(
        csv_file,
        "4H,Sipho,internal,Acme,L7,JHB-DBN,SHIPPED,2024-01-01,,DELIVERED,2024-01-03"
    )
    .unwrap();
    csv_file.flush().unwrap();

    let source = open_file_source(csv_file.path().to_str().unwrap(), None).unwrap();
    let report = state.import_api.import_trips(source.as_ref()).await.unwrap();
    assert_eq!(report.summary.imported, 1);

    let trips = state.import_api.list_trips().await.unwrap();
    assert_eq!(trips[0].revenue_currency, Currency::Usd);
}

#[tokio::test]
async fn test_missing_webhook_url_is_config_error() {
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
    let state = AppState::new(db_path.clone()).await.unwrap();

    let err = state.import_api.import_trips_from_webhook().await.unwrap_err();
    assert!(matches!(err, ApiError::ConfigError(_)));

    let err = state
        .import_api
        .import_driver_behavior_from_webhook()
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ConfigError(_)));
}

#[tokio::test]
async fn test_import_all_isolates_pipeline_failures() {
    let trips_stub = test_helpers::spawn_http_stub(200, TRIPS_BODY).await;
    let events_stub = test_helpers::spawn_http_stub(500, "").await;
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
    configure(
        &db_path,
        &[
            (
                config_keys::TRIPS_WEBHOOK_URL,
                &*format!("{}/exec", trips_stub.base_url),
            ),
            (
                config_keys::DRIVER_BEHAVIOR_WEBHOOK_URL,
                &*format!("{}/exec", events_stub.base_url),
            ),
        ],
    );

    let state = AppState::new(db_path.clone()).await.unwrap();
    let response = state.import_api.import_all().await;

    let trips = response.trips.as_ref().unwrap();
    assert_eq!(trips.summary, ImportSummary { imported: 2, skipped: 1 });
    assert!(matches!(
        response.driver_behavior,
        Err(ApiError::SourceUnavailable(_))
    ));

    let trips_json = serde_json::to_value(response.trips_result()).unwrap();
    assert_eq!(trips_json["status"], "completed");
    assert_eq!(trips_json["imported"], 2);
    assert_eq!(trips_json["skipped"], 1);
    assert!(matches!(
        response.driver_behavior_result(),
        PipelineResult::Failed { .. }
    ));

    assert!(state
        .import_api
        .list_driver_behavior_events()
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_repeat_webhook_import_is_idempotent() {
    let stub = test_helpers::spawn_http_stub(200, TRIPS_BODY).await;
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
    configure(
        &db_path,
        &[(config_keys::TRIPS_WEBHOOK_URL, &*format!("{}/exec", stub.base_url))],
    );

    let state = AppState::new(db_path.clone()).await.unwrap();
    let first = state.import_api.import_trips_from_webhook().await.unwrap();
    let second = state.import_api.import_trips_from_webhook().await.unwrap();

    assert_eq!(first.summary.imported, 2);
    assert_eq!(second.summary, ImportSummary { imported: 0, skipped: 3 });
    assert_eq!(stub.request_lines().len(), 2);
}
