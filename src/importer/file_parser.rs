// ==========================================
// 车队运营跟踪系统 - 文件数据源
// ==========================================
// 支持: Excel (.xlsx) / CSV (.csv)
// 说明: 读取与 webhook 同结构的表格导出，按列位置生成原始行
// 红线: 空白行保留，交给校验层拒绝并计数（与 webhook 口径一致）
// ==========================================

use crate::domain::import::RawRow;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::source::{RowSource, DEFAULT_SHEET};
use async_trait::async_trait;
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use csv::ReaderBuilder;
use serde_json::{Number, Value};
use std::fs::File;
use std::path::{Path, PathBuf};

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

// ==========================================
// CsvRowSource
// ==========================================
pub struct CsvRowSource {
    path: PathBuf,
    has_headers: bool,
}

impl CsvRowSource {
    /// 默认无表头：第一行即数据行
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            has_headers: false,
        }
    }

    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    fn read_rows(&self) -> ImportResult<Vec<RawRow>> {
        let path = self.path.as_path();
        ensure_exists(path)?;

        let ext = extension_of(path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(self.has_headers)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(RawRow::from_texts(record.iter()));
        }

        Ok(rows)
    }
}

#[async_trait]
impl RowSource for CsvRowSource {
    fn source_id(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_rows(&self) -> ImportResult<Vec<RawRow>> {
        self.read_rows()
    }
}

// ==========================================
// ExcelRowSource
// ==========================================
pub struct ExcelRowSource {
    path: PathBuf,
    sheet: String,
}

impl ExcelRowSource {
    pub fn new(path: impl Into<PathBuf>, sheet: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sheet: sheet.into(),
        }
    }

    fn read_rows(&self) -> ImportResult<Vec<RawRow>> {
        let path = self.path.as_path();
        ensure_exists(path)?;

        let ext = extension_of(path);
        if ext != "xlsx" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook: Xlsx<_> = open_workbook(path)?;

        if !workbook.sheet_names().iter().any(|name| name == &self.sheet) {
            return Err(ImportError::ExcelParseError(format!(
                "工作表不存在: {}",
                self.sheet
            )));
        }

        let range = workbook.worksheet_range(&self.sheet)?;
        Ok(rows_from_range(&range))
    }
}

/// 工作表区域 → 原始行
///
/// calamine 的区域从第一个非空单元格开始；这里补齐区域前的空行和空列，
/// 保证列下标与工作表绝对列号一致（A 列 = 0）
fn rows_from_range(range: &Range<Data>) -> Vec<RawRow> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    let leading = std::iter::repeat_with(RawRow::default).take(start_row as usize);
    let body = range.rows().map(|cells| {
        let mut values = vec![Value::Null; start_col as usize];
        values.extend(cells.iter().map(cell_to_value));
        RawRow::new(values)
    });

    leading.chain(body).collect()
}

/// 单元格 → JSON 值（与 webhook 响应的单元格同口径）
fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::String(s) => Value::String(s.clone()),
        Data::Bool(b) => Value::Bool(*b),
        Data::Int(i) => Value::Number((*i).into()),
        Data::Float(f) => {
            // 整数值的浮点单元格按整数输出（计数列常见）
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                Value::Number((*f as i64).into())
            } else {
                Number::from_f64(*f)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        other => Value::String(other.to_string()),
    }
}

#[async_trait]
impl RowSource for ExcelRowSource {
    fn source_id(&self) -> String {
        format!("{}#{}", self.path.display(), self.sheet)
    }

    async fn fetch_rows(&self) -> ImportResult<Vec<RawRow>> {
        self.read_rows()
    }
}

// ==========================================
// 按扩展名选择文件数据源
// ==========================================
pub fn open_file_source(
    path: impl AsRef<Path>,
    sheet: Option<&str>,
) -> ImportResult<Box<dyn RowSource>> {
    let path = path.as_ref();
    ensure_exists(path)?;

    match extension_of(path).as_str() {
        "csv" => Ok(Box::new(CsvRowSource::new(path))),
        "xlsx" => Ok(Box::new(ExcelRowSource::new(
            path,
            sheet.unwrap_or(DEFAULT_SHEET),
        ))),
        other => Err(ImportError::UnsupportedFormat(other.to_string())),
    }
}
