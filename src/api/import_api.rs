// ==========================================
// 车队运营跟踪系统 - 导入API
// ==========================================
// 职责: 装配导入管道（配置 + 存储 + 编排器），对外提供导入 / 查询入口
// ==========================================

use crate::api::error::ApiResult;
use crate::config::{config_keys, ImportConfigReader};
use crate::domain::driver_behavior::DriverBehaviorEvent;
use crate::domain::import::{ImportReport, ImportSummary};
use crate::domain::trip::Trip;
use crate::importer::error::ImportError;
use crate::importer::{
    DriverBehaviorImporter, DriverBehaviorPipeline, ImportOrchestrator, RowSource, TripImporter,
    TripPipeline, WebhookSource,
};
use crate::repository::EntityStore;
use futures::future::join;
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

/// 两条管道并发导入的结果（互不影响）
#[derive(Debug)]
pub struct ImportAllResponse {
    pub trips: ApiResult<ImportReport>,
    pub driver_behavior: ApiResult<ImportReport>,
}

/// 单条管道的对外结果（CLI / 前端展示）
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PipelineResult {
    Completed {
        #[serde(flatten)]
        summary: ImportSummary,
    },
    Failed {
        error: String,
    },
}

impl From<&ApiResult<ImportReport>> for PipelineResult {
    fn from(result: &ApiResult<ImportReport>) -> Self {
        match result {
            Ok(report) => PipelineResult::Completed {
                summary: report.summary,
            },
            Err(e) => PipelineResult::Failed {
                error: e.to_string(),
            },
        }
    }
}

impl ImportAllResponse {
    pub fn trips_result(&self) -> PipelineResult {
        PipelineResult::from(&self.trips)
    }

    pub fn driver_behavior_result(&self) -> PipelineResult {
        PipelineResult::from(&self.driver_behavior)
    }
}

/// 导入API
pub struct ImportApi {
    config: Arc<dyn ImportConfigReader>,
    trip_store: Arc<dyn EntityStore<Trip>>,
    event_store: Arc<dyn EntityStore<DriverBehaviorEvent>>,
    trips: TripImporter,
    driver_behavior: DriverBehaviorImporter,
}

impl ImportApi {
    /// 创建新的ImportApi实例
    ///
    /// 映射默认值（币种 / 上报人）在创建时从配置读取一次
    pub async fn new(
        config: Arc<dyn ImportConfigReader>,
        trip_store: Arc<dyn EntityStore<Trip>>,
        event_store: Arc<dyn EntityStore<DriverBehaviorEvent>>,
    ) -> ApiResult<Self> {
        let currency = config.get_default_currency().await?;
        let reported_by = config.get_reported_by().await?;

        let trips = ImportOrchestrator::new(TripPipeline::new(currency), trip_store.clone());
        let driver_behavior = ImportOrchestrator::new(
            DriverBehaviorPipeline::new(reported_by),
            event_store.clone(),
        );

        Ok(Self {
            config,
            trip_store,
            event_store,
            trips,
            driver_behavior,
        })
    }

    // ===== 指定数据源 =====

    /// 导入行程
    pub async fn import_trips(&self, source: &dyn RowSource) -> ApiResult<ImportReport> {
        Ok(self.trips.import_batch(source).await?)
    }

    /// 导入驾驶行为事件
    pub async fn import_driver_behavior(&self, source: &dyn RowSource) -> ApiResult<ImportReport> {
        Ok(self.driver_behavior.import_batch(source).await?)
    }

    // ===== 配置的 webhook 数据源 =====

    #[instrument(skip(self))]
    pub async fn import_trips_from_webhook(&self) -> ApiResult<ImportReport> {
        let url = self
            .config
            .get_trips_webhook_url()
            .await?
            .ok_or_else(|| ImportError::MissingConfig(config_keys::TRIPS_WEBHOOK_URL.to_string()))?;
        let source = self.webhook_source(url).await?;
        self.import_trips(&source).await
    }

    #[instrument(skip(self))]
    pub async fn import_driver_behavior_from_webhook(&self) -> ApiResult<ImportReport> {
        let url = self
            .config
            .get_driver_behavior_webhook_url()
            .await?
            .ok_or_else(|| {
                ImportError::MissingConfig(config_keys::DRIVER_BEHAVIOR_WEBHOOK_URL.to_string())
            })?;
        let source = self.webhook_source(url).await?;
        self.import_driver_behavior(&source).await
    }

    /// 两条管道并发导入；一条失败不影响另一条
    pub async fn import_all(&self) -> ImportAllResponse {
        let (trips, driver_behavior) = join(
            self.import_trips_from_webhook(),
            self.import_driver_behavior_from_webhook(),
        )
        .await;
        ImportAllResponse {
            trips,
            driver_behavior,
        }
    }

    async fn webhook_source(&self, url: String) -> ApiResult<WebhookSource> {
        let sheet = self.config.get_sheet_name().await?;
        let timeout_ms = self.config.get_fetch_timeout_ms().await?;
        Ok(WebhookSource::with_timeout_ms(url, sheet, timeout_ms)?)
    }

    // ===== 查询 =====

    pub async fn list_trips(&self) -> ApiResult<Vec<Trip>> {
        Ok(self.trip_store.list().await?)
    }

    pub async fn list_driver_behavior_events(&self) -> ApiResult<Vec<DriverBehaviorEvent>> {
        Ok(self.event_store.list().await?)
    }
}

