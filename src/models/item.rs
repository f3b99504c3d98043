use crate::error::SyncError;
use crate::table::Table;
use indexmap::IndexMap;

pub const COL_ITEM_CODE: &str = "COD_ITEM";
pub const COL_ITEM_DESCRIPTION: &str = "DESCRICAO";
pub const COL_NCM: &str = "NCM";

/// 规范化 NCM: 去首尾空白、去前导零; 空串或 "nan" 视为缺失
pub fn normalize_ncm(raw: &str) -> Option<String> {
    let code = raw.trim().trim_start_matches('0');
    if code.is_empty() || code == "nan" {
        None
    } else {
        Some(code.to_string())
    }
}

/// 商品主数据记录 (item extract)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    pub item_code: String,
    pub description: String,
    pub ncm: String,
}

/// 按 NCM 聚合的商品主数据
///
/// 每个 NCM 只保留输入顺序中首次出现的记录作为代表, 同时记录共享该 NCM 的行数。
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    representatives: IndexMap<String, ItemRecord>,
    row_counts: IndexMap<String, usize>,
    total_rows: usize,
}

impl ItemCatalog {
    /// 从 item extract 表构建; 缺少 COD_ITEM / DESCRICAO / NCM 任一列即失败
    pub fn from_table(table: &Table, source: &str) -> Result<Self, SyncError> {
        let code_idx = table.require_column(COL_ITEM_CODE, source)?;
        let desc_idx = table.require_column(COL_ITEM_DESCRIPTION, source)?;
        let ncm_idx = table.require_column(COL_NCM, source)?;

        let mut catalog = Self {
            total_rows: table.len(),
            ..Self::default()
        };

        for row in &table.rows {
            let Some(ncm) = normalize_ncm(&row[ncm_idx]) else {
                continue;
            };
            *catalog.row_counts.entry(ncm.clone()).or_insert(0) += 1;
            catalog
                .representatives
                .entry(ncm.clone())
                .or_insert_with(|| ItemRecord {
                    item_code: row[code_idx].trim().to_string(),
                    description: row[desc_idx].trim().to_string(),
                    ncm,
                });
        }

        Ok(catalog)
    }

    pub fn get(&self, ncm: &str) -> Option<&ItemRecord> {
        self.representatives.get(ncm)
    }

    /// 共享该 NCM 的商品行数
    pub fn row_count(&self, ncm: &str) -> usize {
        self.row_counts.get(ncm).copied().unwrap_or(0)
    }

    /// 按首次出现顺序的全部 NCM
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.representatives.keys().map(String::as_str)
    }

    pub fn unique_keys(&self) -> usize {
        self.representatives.len()
    }

    /// 具有有效 NCM 的行数
    pub fn rows_with_key(&self) -> usize {
        self.row_counts.values().sum()
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }
}
