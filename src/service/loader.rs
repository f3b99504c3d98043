use crate::config::LoaderConfig;
use crate::db::QuotationStore;
use crate::error::SyncError;
use crate::models::{QuotationColumns, QuotationRow};
use crate::service::confirm::Confirmation;
use crate::table::Table;
use std::time::Duration;

/// 单行插入失败记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    /// 源文件行号 (含表头, 从 1 开始)
    pub line: usize,
    pub ncm: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub source_rows: usize,
    pub inserted: usize,
    pub failures: Vec<RowFailure>,
    /// 导入后目标表实际行数
    pub rows_in_store: i64,
}

impl LoadReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// 用户未确认, 未做任何修改
    Cancelled,
    Completed(LoadReport),
}

/// 报价导入: 确认 -> 清空目标表 -> 逐行插入 (分批提交) -> 核对行数
pub struct QuotationLoader<S, C> {
    store: S,
    confirmation: C,
    settings: LoaderConfig,
}

impl<S: QuotationStore, C: Confirmation> QuotationLoader<S, C> {
    pub fn new(store: S, confirmation: C, settings: LoaderConfig) -> Self {
        Self {
            store,
            confirmation,
            settings,
        }
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub async fn load(&mut self, table: &Table, source: &str) -> Result<LoadOutcome, SyncError> {
        // 先校验列, 保证格式错误的文件不会走到清表
        let cols = QuotationColumns::locate(table, source)?;
        let rows: Vec<QuotationRow> = table
            .rows
            .iter()
            .map(|cells| QuotationRow::from_cells(cells, &cols))
            .collect();

        let prompt = format!(
            "\n{bar}\nWARNING: every row in table 'quotations' will be DELETED!\n{bar}\n\
             This will:\n   1. DELETE all existing rows in 'quotations'\n   2. INSERT the rows from {source}\n\n\
             Rows to insert: {count}\n{bar}\n\nProceed? Type Y for YES or N for NO: ",
            bar = "!".repeat(70),
            count = rows.len(),
        );
        let confirmed = self
            .confirmation
            .confirm(&prompt)
            .map_err(|e| SyncError::io("<stdin>", e))?;
        if !confirmed {
            tracing::warn!("Operation cancelled by user");
            return Ok(LoadOutcome::Cancelled);
        }

        tracing::info!("Clearing table 'quotations'...");
        self.store.clear().await?;
        tracing::info!("Table cleared");

        tracing::info!("Inserting {} rows...", rows.len());
        let (inserted, failures) = match self.insert_all(&rows).await {
            Ok(done) => done,
            Err(e) => {
                tracing::error!("Load aborted: {}", e);
                if let Err(rollback_err) = self.store.rollback().await {
                    tracing::error!("Rollback failed: {}", rollback_err);
                }
                return Err(e);
            }
        };

        let rows_in_store = self.store.count().await?;

        Ok(LoadOutcome::Completed(LoadReport {
            source_rows: rows.len(),
            inserted,
            failures,
            rows_in_store,
        }))
    }

    /// 逐行插入; 单行失败只计数, 事务/连接级错误向上返回
    async fn insert_all(&mut self, rows: &[QuotationRow]) -> Result<(usize, Vec<RowFailure>), SyncError> {
        let commit_every = self.settings.commit_every.max(1);
        let insert_timeout = Duration::from_secs(self.settings.insert_timeout_secs);
        let mut inserted = 0usize;
        let mut failures = Vec::new();

        self.store.begin().await?;
        for (idx, row) in rows.iter().enumerate() {
            // 超时按单行失败处理
            let result = match tokio::time::timeout(insert_timeout, self.store.insert(row)).await {
                Ok(result) => result.map_err(|e| e.to_string()),
                Err(_) => Err(format!("INSERT timed out (>{:?})", insert_timeout)),
            };
            match result {
                Ok(()) => {
                    inserted += 1;
                    if inserted % commit_every == 0 {
                        tracing::info!("Inserted: {} rows...", inserted);
                        self.store.commit().await?;
                        self.store.begin().await?;
                    }
                }
                Err(e) => {
                    let failure = RowFailure {
                        // +2: 表头占一行, 行号从 1 开始
                        line: idx + 2,
                        ncm: row.ncm.clone().unwrap_or_default(),
                        message: e,
                    };
                    tracing::warn!("Line {}, NCM {}: {}", failure.line, failure.ncm, failure.message);
                    failures.push(failure);
                }
            }
        }
        self.store.commit().await?;

        Ok((inserted, failures))
    }

    /// 收尾: 输出报告; 存储层故障 (已回滚) 记录后正常结束, 输入错误向上返回
    pub fn finish(&self, result: Result<LoadOutcome, SyncError>) -> Result<(), SyncError> {
        match result {
            Ok(LoadOutcome::Cancelled) => Ok(()),
            Ok(LoadOutcome::Completed(report)) => {
                self.log_report(&report);
                Ok(())
            }
            Err(SyncError::Database(e)) => {
                tracing::error!("Error during the upload: {}", e);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// 打印最终报告
    pub fn log_report(&self, report: &LoadReport) {
        tracing::info!("{}", "=".repeat(70));
        tracing::info!("FINAL REPORT");
        tracing::info!("{}", "=".repeat(70));
        tracing::info!("Rows in CSV: {}", report.source_rows);
        tracing::info!("Rows inserted: {}", report.inserted);
        tracing::info!("Rows with errors: {}", report.failed());

        if !report.failures.is_empty() {
            tracing::warn!("First {} errors:", self.settings.error_preview.min(report.failed()));
            for failure in report.failures.iter().take(self.settings.error_preview) {
                tracing::warn!("  Line {}, NCM {}: {}", failure.line, failure.ncm, failure.message);
            }
        }

        tracing::info!("Rows in table 'quotations': {}", report.rows_in_store);
        if report.rows_in_store != report.inserted as i64 {
            tracing::warn!(
                "Row count mismatch: inserted {}, table holds {}",
                report.inserted,
                report.rows_in_store
            );
        }
    }
}
