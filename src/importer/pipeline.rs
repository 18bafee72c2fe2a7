// ==========================================
// 车队运营跟踪系统 - 导入管道定义
// ==========================================
// 职责: 把“解码 → 校验 → 映射”按导入类型装配成一条管道
// 说明: 编排器只依赖本 Trait；两条管道键空间互相独立
// ==========================================

use crate::domain::driver_behavior::DriverBehaviorEvent;
use crate::domain::entity::StoredEntity;
use crate::domain::import::{ContractVersion, DriverBehaviorRow, RawRow, RejectReason, TripRow};
use crate::domain::trip::Trip;
use crate::domain::types::{Currency, ImportKind};
use crate::importer::dedup_index::DedupIndex;
use crate::importer::field_mapper::{DriverBehaviorFieldMapper, MappingContext, TripFieldMapper};
use crate::importer::row_validator::{DriverBehaviorRowValidator, TripRowValidator};
use std::fmt::Display;
use std::hash::Hash;

// ==========================================
// ImportPipeline Trait
// ==========================================
pub trait ImportPipeline: Send + Sync {
    /// 按列契约解码后的行
    type Row: Send + Sync;
    /// 去重键
    type Key: Eq + Hash + Clone + Display + Send + Sync;
    /// 目标实体
    type Entity: StoredEntity;

    const KIND: ImportKind;
    const CONTRACT: ContractVersion;

    fn decode(&self, raw: &RawRow) -> Self::Row;

    /// 已知实体的去重键；无键返回 None
    fn known_key(&self, entity: &Self::Entity) -> Option<Self::Key>;

    fn validate(
        &self,
        row: &Self::Row,
        known: &DedupIndex<Self::Key>,
    ) -> Result<Self::Key, RejectReason>;

    fn map(
        &self,
        row: &Self::Row,
        key: &Self::Key,
        ctx: &MappingContext,
    ) -> <Self::Entity as StoredEntity>::Draft;
}

// ==========================================
// TripPipeline
// ==========================================
pub struct TripPipeline {
    validator: TripRowValidator,
    mapper: TripFieldMapper,
}

impl TripPipeline {
    pub fn new(default_currency: Currency) -> Self {
        Self {
            validator: TripRowValidator::new(),
            mapper: TripFieldMapper::new(default_currency),
        }
    }
}

impl Default for TripPipeline {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}

impl ImportPipeline for TripPipeline {
    type Row = TripRow;
    type Key = String;
    type Entity = Trip;

    const KIND: ImportKind = ImportKind::Trips;
    const CONTRACT: ContractVersion = TripRow::CONTRACT;

    fn decode(&self, raw: &RawRow) -> TripRow {
        TripRow::from_raw(raw)
    }

    fn known_key(&self, entity: &Trip) -> Option<String> {
        entity.dedup_key()
    }

    fn validate(&self, row: &TripRow, known: &DedupIndex<String>) -> Result<String, RejectReason> {
        self.validator.validate(row, known)
    }

    fn map(&self, row: &TripRow, key: &String, ctx: &MappingContext) -> crate::domain::TripDraft {
        self.mapper.map(row, key, ctx)
    }
}

// ==========================================
// DriverBehaviorPipeline
// ==========================================
pub struct DriverBehaviorPipeline {
    validator: DriverBehaviorRowValidator,
    mapper: DriverBehaviorFieldMapper,
}

impl DriverBehaviorPipeline {
    pub fn new(reported_by: impl Into<String>) -> Self {
        Self {
            validator: DriverBehaviorRowValidator::new(),
            mapper: DriverBehaviorFieldMapper::new(reported_by),
        }
    }
}

impl Default for DriverBehaviorPipeline {
    fn default() -> Self {
        Self::new(crate::config::config_manager::defaults::REPORTED_BY)
    }
}

impl ImportPipeline for DriverBehaviorPipeline {
    type Row = DriverBehaviorRow;
    type Key = u64;
    type Entity = DriverBehaviorEvent;

    const KIND: ImportKind = ImportKind::DriverBehavior;
    const CONTRACT: ContractVersion = DriverBehaviorRow::CONTRACT;

    fn decode(&self, raw: &RawRow) -> DriverBehaviorRow {
        DriverBehaviorRow::from_raw(raw)
    }

    fn known_key(&self, entity: &DriverBehaviorEvent) -> Option<u64> {
        entity.count
    }

    fn validate(
        &self,
        row: &DriverBehaviorRow,
        known: &DedupIndex<u64>,
    ) -> Result<u64, RejectReason> {
        self.validator.validate(row, known)
    }

    fn map(
        &self,
        row: &DriverBehaviorRow,
        key: &u64,
        ctx: &MappingContext,
    ) -> crate::domain::DriverBehaviorEventDraft {
        self.mapper.map(row, *key, ctx)
    }
}
