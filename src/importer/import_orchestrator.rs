// ==========================================
// 车队运营跟踪系统 - 导入编排器
// ==========================================
// 流程: 拉取 → 建去重索引 → 逐行(解码 → 校验 → 映射 → 提交)
// 红线:
// - 行级问题只计入 skipped，不中断批次
// - 每行提交完成后才处理下一行（同一时刻最多一个写入）
// - 批次级失败（拉取 / 响应格式）直接返回错误，不做部分处理
// ==========================================

use crate::domain::import::{ImportBatch, ImportReport, ImportSummary, RawRow, RowOutcome, RowReport};
use crate::importer::dedup_index::DedupIndex;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::MappingContext;
use crate::importer::pipeline::ImportPipeline;
use crate::importer::source::RowSource;
use crate::repository::entity_store::EntityStore;
use crate::sync::EntityCache;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

pub struct ImportOrchestrator<P: ImportPipeline> {
    pipeline: P,
    store: Arc<dyn EntityStore<P::Entity>>,
    cache: EntityCache<P::Entity>,
}

impl<P: ImportPipeline> ImportOrchestrator<P> {
    pub fn new(pipeline: P, store: Arc<dyn EntityStore<P::Entity>>) -> Self {
        let cache = EntityCache::attach(store.as_ref());
        Self {
            pipeline,
            store,
            cache,
        }
    }

    /// 执行一次导入，只返回汇总
    pub async fn import(&self, source: &dyn RowSource) -> ImportResult<ImportSummary> {
        Ok(self.import_batch(source).await?.summary)
    }

    /// 执行一次导入，返回逐行明细
    ///
    /// # 返回
    /// - Ok(ImportReport): imported + skipped == 拉取行数
    /// - Err: 批次级失败（不可达 / 非 2xx / 响应格式错误）
    #[instrument(skip(self, source), fields(kind = %P::KIND, source = %source.source_id()))]
    pub async fn import_batch(&self, source: &dyn RowSource) -> ImportResult<ImportReport> {
        let start_time = Instant::now();
        let source_id = source.source_id();

        // === 步骤 1: 拉取 ===
        let rows = source.fetch_rows().await.map_err(|e| {
            error!(error = %e, "批次拉取失败");
            e
        })?;
        info!(total_rows = rows.len(), "开始导入");

        // === 步骤 2: 由最新快照建立去重索引 ===
        let snapshot = self.cache.snapshot();
        let mut known: DedupIndex<P::Key> =
            DedupIndex::from_known(snapshot.iter().map(|e| self.pipeline.known_key(e)));
        debug!(known_keys = known.len(), "去重索引就绪");

        // === 步骤 3: 逐行处理 ===
        let ctx = MappingContext::new(source_id.clone());
        let mut batch = ImportBatch::new(P::KIND, source_id, rows);
        let mut reports = Vec::with_capacity(batch.len());

        for idx in 0..batch.len() {
            let row_number = idx + 1;
            let outcome = self
                .process_row(&batch.rows[idx], row_number, &mut known, &ctx)
                .await;
            batch.record(&outcome);
            reports.push(RowReport {
                row_number,
                outcome,
            });
        }

        // === 步骤 4: 汇总 ===
        let summary = batch.summary();
        let elapsed = start_time.elapsed();
        info!(
            imported = summary.imported,
            skipped = summary.skipped,
            elapsed_ms = elapsed.as_millis() as u64,
            "导入完成"
        );

        Ok(ImportReport {
            kind: P::KIND,
            source_id: batch.source_id,
            contract: P::CONTRACT,
            summary,
            rows: reports,
            elapsed,
        })
    }

    async fn process_row(
        &self,
        raw: &RawRow,
        row_number: usize,
        known: &mut DedupIndex<P::Key>,
        ctx: &MappingContext,
    ) -> RowOutcome {
        let row = self.pipeline.decode(raw);

        let key = match self.pipeline.validate(&row, known) {
            Ok(key) => key,
            Err(reason) => {
                debug!(row = row_number, code = reason.code(), "行被拒绝");
                return RowOutcome::Rejected { reason };
            }
        };

        let draft = self.pipeline.map(&row, &key, ctx);

        match self.store.add(draft).await {
            Ok(entity_id) => {
                known.insert(key.clone());
                RowOutcome::Accepted {
                    key: key.to_string(),
                    entity_id,
                }
            }
            Err(e) => {
                warn!(row = row_number, key = %key, error = %e, "行提交失败，计入 skipped");
                RowOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }
}
