use crate::config::FilesConfig;
use crate::error::SyncError;
use crate::export;
use crate::models::{normalize_ncm, AuditEntry, ItemCatalog, QuotationColumns, RowStatus, UnmatchedItem};
use crate::table::Table;
use std::collections::BTreeSet;

/// 三个互不相交的 NCM 集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySets {
    /// 两边都存在
    pub matched: BTreeSet<String>,
    /// 仅在商品主数据中
    pub item_only: BTreeSet<String>,
    /// 仅在报价表中 (过时, 将被删除)
    pub quotation_only: BTreeSet<String>,
}

impl KeySets {
    pub fn partition(item_keys: &BTreeSet<String>, quotation_keys: &BTreeSet<String>) -> Self {
        Self {
            matched: item_keys.intersection(quotation_keys).cloned().collect(),
            item_only: item_keys.difference(quotation_keys).cloned().collect(),
            quotation_only: quotation_keys.difference(item_keys).cloned().collect(),
        }
    }
}

/// 对账统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub item_rows: usize,
    pub item_rows_with_key: usize,
    pub item_unique_keys: usize,
    pub quotation_rows: usize,
    pub quotation_unique_keys: usize,
    pub mappings: usize,
    pub updated: usize,
    pub kept: usize,
    pub removed: usize,
    pub added: usize,
    pub output_rows: usize,
}

impl ReconcileStats {
    /// 更新比例 (相对原报价表行数)
    pub fn update_percentage(&self) -> f64 {
        if self.quotation_rows == 0 {
            0.0
        } else {
            self.updated as f64 / self.quotation_rows as f64 * 100.0
        }
    }
}

/// 一次对账的完整结果
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub table: Table,
    pub keys: KeySets,
    pub audit: Vec<AuditEntry>,
    pub unmatched_items: Vec<UnmatchedItem>,
    pub stats: ReconcileStats,
}

/// 以 NCM 为键, 用商品主数据更新报价表
///
/// 命中行只覆盖料号与描述, 系数列保持原值; 仅存在于报价表的 NCM 行被删除;
/// 仅存在于主数据的 NCM 以空系数追加 (按 NCM 升序)。
pub fn reconcile(catalog: &ItemCatalog, mut quotation: Table, source: &str) -> Result<Reconciliation, SyncError> {
    let cols = QuotationColumns::locate(&quotation, source)?;
    let quotation_rows = quotation.len();

    // 1. 规范化报价表 NCM (写回表中)
    for row in quotation.rows.iter_mut() {
        row[cols.ncm] = normalize_ncm(&row[cols.ncm]).unwrap_or_default();
    }

    // 2. 计算 NCM 集合
    let item_keys: BTreeSet<String> = catalog.keys().map(str::to_string).collect();
    let quotation_keys: BTreeSet<String> = quotation
        .rows
        .iter()
        .map(|row| row[cols.ncm].clone())
        .filter(|ncm| !ncm.is_empty())
        .collect();
    let keys = KeySets::partition(&item_keys, &quotation_keys);

    tracing::info!("Unique NCMs in item extract: {}", item_keys.len());
    tracing::info!("Unique NCMs in quotation base: {}", quotation_keys.len());
    tracing::info!("NCMs present in both: {}", keys.matched.len());
    tracing::info!("NCMs only in item extract: {}", keys.item_only.len());
    tracing::info!("NCMs only in quotation base (will be removed): {}", keys.quotation_only.len());

    // 3. 更新命中行
    let mut audit = Vec::with_capacity(quotation_rows + keys.item_only.len());
    let mut updated = 0;
    let mut kept = 0;

    for row in quotation.rows.iter_mut() {
        let ncm = row[cols.ncm].clone();
        let original_microsiga = row[cols.microsiga_pn].clone();
        let original_oracle = row[cols.oracle_pn].clone();
        let original_desc = row[cols.description].clone();

        let mapped = if keys.matched.contains(&ncm) {
            catalog.get(&ncm)
        } else {
            None
        };
        let entry = match mapped {
            Some(item) => {
                row[cols.microsiga_pn] = item.item_code.clone();
                row[cols.oracle_pn] = item.item_code.clone();
                row[cols.description] = item.description.clone();
                updated += 1;
                AuditEntry {
                    ncm,
                    status: RowStatus::Updated,
                    microsiga_pn_original: original_microsiga,
                    microsiga_pn_new: item.item_code.clone(),
                    oracle_pn_original: original_oracle,
                    oracle_pn_new: item.item_code.clone(),
                    description_original: original_desc,
                    description_new: item.description.clone(),
                }
            }
            None => {
                kept += 1;
                AuditEntry {
                    ncm,
                    status: RowStatus::Kept,
                    microsiga_pn_new: original_microsiga.clone(),
                    microsiga_pn_original: original_microsiga,
                    oracle_pn_new: original_oracle.clone(),
                    oracle_pn_original: original_oracle,
                    description_new: original_desc.clone(),
                    description_original: original_desc,
                }
            }
        };
        audit.push(entry);
    }

    tracing::info!("Rows updated: {}", updated);
    tracing::info!("Rows kept as-is (NCM not in item extract): {}", kept);

    // 4. 删除过时 NCM 行
    quotation
        .rows
        .retain(|row| !keys.quotation_only.contains(&row[cols.ncm]));
    let removed = quotation_rows - quotation.len();
    tracing::info!("Rows removed (obsolete NCMs): {}", removed);

    // 5. 追加新 NCM 行
    let mut unmatched_items = Vec::with_capacity(keys.item_only.len());
    for ncm in &keys.item_only {
        let Some(item) = catalog.get(ncm) else {
            continue;
        };

        let row = quotation.push_blank_row();
        row[cols.microsiga_pn] = item.item_code.clone();
        row[cols.oracle_pn] = item.item_code.clone();
        row[cols.description] = item.description.clone();
        row[cols.ncm] = ncm.clone();

        audit.push(AuditEntry {
            ncm: ncm.clone(),
            status: RowStatus::Added,
            microsiga_pn_original: String::new(),
            microsiga_pn_new: item.item_code.clone(),
            oracle_pn_original: String::new(),
            oracle_pn_new: item.item_code.clone(),
            description_original: String::new(),
            description_new: item.description.clone(),
        });
        unmatched_items.push(UnmatchedItem {
            ncm: ncm.clone(),
            item_code: item.item_code.clone(),
            item_rows: catalog.row_count(ncm),
        });
    }
    let added = unmatched_items.len();
    tracing::info!("Rows added (new NCMs without factors): {}", added);

    let stats = ReconcileStats {
        item_rows: catalog.total_rows(),
        item_rows_with_key: catalog.rows_with_key(),
        item_unique_keys: catalog.unique_keys(),
        quotation_rows,
        quotation_unique_keys: quotation_keys.len(),
        mappings: keys.matched.len(),
        updated,
        kept,
        removed,
        added,
        output_rows: quotation.len(),
    };

    Ok(Reconciliation {
        table: quotation,
        keys,
        audit,
        unmatched_items,
        stats,
    })
}

/// 对账服务: 读取两个输入文件, 对账, 写出更新表、对照表与错误报告
pub struct ReconcilerService {
    files: FilesConfig,
}

impl ReconcilerService {
    pub fn new(files: FilesConfig) -> Self {
        Self { files }
    }

    pub fn run(&self) -> Result<ReconcileStats, SyncError> {
        let delimiter = self.files.delimiter_byte();

        // 1. 加载输入
        let item_path = self.files.item_extract_path();
        tracing::info!("Loading {}", item_path.display());
        let item_table = Table::read(&item_path, delimiter)?;
        tracing::info!("Rows in item extract: {}", item_table.len());

        let quotation_path = self.files.quotation_base_path();
        tracing::info!("Loading {}", quotation_path.display());
        let quotation_table = Table::read(&quotation_path, delimiter)?;
        tracing::info!("Rows in quotation base: {}", quotation_table.len());

        tracing::info!("Item extract columns: {:?}", item_table.headers);
        tracing::info!("Quotation base columns: {:?}", quotation_table.headers);

        // 2. 构建主数据映射
        let catalog = ItemCatalog::from_table(&item_table, &self.files.item_extract)?;
        tracing::info!("Item rows with a valid NCM: {}", catalog.rows_with_key());

        // 3. 对账
        let result = reconcile(&catalog, quotation_table, &self.files.quotation_base)?;
        let stats = &result.stats;

        tracing::info!("{}", "=".repeat(80));
        tracing::info!("SUMMARY");
        tracing::info!("{}", "=".repeat(80));
        tracing::info!("Mappings created: {}", stats.mappings);
        tracing::info!("Rows in original quotation base: {}", stats.quotation_rows);
        tracing::info!("Rows in updated quotation base: {}", stats.output_rows);
        tracing::info!("Rows updated: {}", stats.updated);
        tracing::info!("Rows kept: {}", stats.kept);
        tracing::info!("Update percentage: {:.2}%", stats.update_percentage());

        if !result.keys.quotation_only.is_empty() {
            tracing::info!(
                "--- NCMs sem correspondência ({} NCMs) ---",
                result.keys.quotation_only.len()
            );
            for ncm in &result.keys.quotation_only {
                tracing::info!("  NCM: {}", ncm);
            }
        }

        if !result.unmatched_items.is_empty() {
            tracing::info!(
                "--- Item extract NCMs without factors ({} NCMs) ---",
                result.unmatched_items.len()
            );
            for item in &result.unmatched_items {
                tracing::info!("  NCM: {} | COD_ITEM: {} | Qtd: {}", item.ncm, item.item_code, item.item_rows);
            }
        }

        // 4. 写出结果
        let unmatched_path = self.files.unmatched_report_path();
        export::export_unmatched_items(&result.unmatched_items, &unmatched_path)?;
        tracing::info!("Unmatched NCM report saved to {}", unmatched_path.display());

        let output_path = self.files.updated_quotation_path();
        result.table.write(&output_path, delimiter)?;
        tracing::info!("Updated quotation base saved to {}", output_path.display());

        let comparison_path = self.files.comparison_path();
        export::export_audit_csv(&result.audit, &comparison_path, delimiter)?;
        tracing::info!("Comparison file saved to {}", comparison_path.display());

        Ok(result.stats)
    }
}
