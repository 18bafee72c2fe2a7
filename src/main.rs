// ==========================================
// 车队运营跟踪系统 - 导入命令行入口
// ==========================================
// 用法:
//   fleet-import <trips|driver-behavior|all> [--db PATH] [--url URL | --file PATH]
//                [--sheet NAME] [--json-log]
//
// 不指定 --url / --file 时使用 config_kv 中配置的 webhook 地址与工作表名（--sheet 不可用）
// 输出: 导入汇总 JSON（stdout）
// ==========================================

use anyhow::{anyhow, bail, Context};
use fleet_ops_import::api::{ApiResult, ImportAllResponse};
use fleet_ops_import::app::{get_default_db_path, AppState};
use fleet_ops_import::config::ImportConfigReader;
use fleet_ops_import::importer::{open_file_source, ImportError, RowSource, WebhookSource};
use fleet_ops_import::{i18n, logging, ImportReport};
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Trips,
    DriverBehavior,
    All,
}

#[derive(Debug)]
struct CliArgs {
    command: Command,
    db_path: Option<String>,
    url: Option<String>,
    file: Option<String>,
    sheet: Option<String>,
    json_log: bool,
}

fn usage() -> &'static str {
    "用法: fleet-import <trips|driver-behavior|all> [--db PATH] [--url URL | --file PATH] [--sheet NAME] [--json-log]"
}

fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<CliArgs> {
    let mut args = args.into_iter();

    let command = match args.next().as_deref() {
        Some("trips") => Command::Trips,
        Some("driver-behavior") => Command::DriverBehavior,
        Some("all") => Command::All,
        Some(other) => bail!("未知命令: {}\n{}", other, usage()),
        None => bail!("{}", usage()),
    };

    let mut parsed = CliArgs {
        command,
        db_path: None,
        url: None,
        file: None,
        sheet: None,
        json_log: false,
    };

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--db" => parsed.db_path = Some(args.next().context("--db 缺少参数")?),
            "--url" => parsed.url = Some(args.next().context("--url 缺少参数")?),
            "--file" => parsed.file = Some(args.next().context("--file 缺少参数")?),
            "--sheet" => parsed.sheet = Some(args.next().context("--sheet 缺少参数")?),
            "--json-log" => parsed.json_log = true,
            other => bail!("未知参数: {}\n{}", other, usage()),
        }
    }

    if parsed.url.is_some() && parsed.file.is_some() {
        bail!("--url 与 --file 不能同时使用");
    }
    if parsed.command == Command::All && (parsed.url.is_some() || parsed.file.is_some()) {
        bail!("all 只使用配置的 webhook 地址，不接受 --url / --file");
    }
    // 配置的 webhook 使用 import.sheet_name
    if parsed.sheet.is_some() && parsed.url.is_none() && parsed.file.is_none() {
        bail!("--sheet 只能与 --url 或 --file 一起使用");
    }

    Ok(parsed)
}

async fn explicit_source(
    state: &AppState,
    args: &CliArgs,
) -> anyhow::Result<Option<Box<dyn RowSource>>> {
    let sheet = match &args.sheet {
        Some(sheet) => sheet.clone(),
        None => state.config.get_sheet_name().await?,
    };

    if let Some(url) = &args.url {
        let timeout_ms = state.config.get_fetch_timeout_ms().await?;
        return Ok(Some(Box::new(WebhookSource::with_timeout_ms(
            url.clone(),
            sheet,
            timeout_ms,
        )?)));
    }

    if let Some(file) = &args.file {
        let source = open_file_source(file, Some(sheet.as_str())).map_err(|e| match e {
            ImportError::FileNotFound(path) => anyhow!(i18n::t_with_args(
                "import.file_not_found",
                &[("path", path.as_str())]
            )),
            other => other.into(),
        })?;
        return Ok(Some(source));
    }

    Ok(None)
}

fn summary_json(report: &ImportReport) -> serde_json::Value {
    json!({
        "kind": report.kind,
        "source": report.source_id,
        "imported": report.summary.imported,
        "skipped": report.summary.skipped,
    })
}

fn batch_failed(result: ApiResult<ImportReport>) -> anyhow::Result<ImportReport> {
    result.map_err(|e| {
        anyhow!(i18n::t_with_args(
            "import.batch_failed",
            &[("reason", e.to_string().as_str())]
        ))
    })
}

fn all_json(response: &ImportAllResponse) -> serde_json::Value {
    json!({
        "trips": response.trips_result(),
        "driverBehavior": response.driver_behavior_result(),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = parse_args(std::env::args().skip(1))?;

    if args.json_log {
        logging::init_json();
    } else {
        logging::init();
    }
    i18n::init_from_env();

    let db_path = args.db_path.clone().unwrap_or_else(get_default_db_path);
    tracing::info!("系统版本: {}, 使用数据库: {}", fleet_ops_import::VERSION, db_path);

    let state = AppState::new(db_path.clone())
        .await
        .map_err(|e| anyhow!("无法初始化AppState: {}", e))?;
    let api = state.import_api.clone();

    let output = match args.command {
        Command::All => {
            let response = api.import_all().await;
            let output = all_json(&response);
            if response.trips.is_err() && response.driver_behavior.is_err() {
                println!("{}", serde_json::to_string_pretty(&output)?);
                bail!("两条导入管道均失败");
            }
            output
        }
        Command::Trips => {
            let report = match explicit_source(&state, &args).await? {
                Some(source) => api.import_trips(source.as_ref()).await,
                None => api.import_trips_from_webhook().await,
            };
            let report = batch_failed(report)?;
            for (row, reason) in report.rejections() {
                tracing::debug!(row, code = reason.code(), "{}", reason.message());
            }
            summary_json(&report)
        }
        Command::DriverBehavior => {
            let report = match explicit_source(&state, &args).await? {
                Some(source) => api.import_driver_behavior(source.as_ref()).await,
                None => api.import_driver_behavior_from_webhook().await,
            };
            let report = batch_failed(report)?;
            for (row, reason) in report.rejections() {
                tracing::debug!(row, code = reason.code(), "{}", reason.message());
            }
            summary_json(&report)
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
