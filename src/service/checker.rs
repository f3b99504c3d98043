use crate::config::FilesConfig;
use crate::error::SyncError;
use crate::export;
use crate::models::quotation::{COL_DESCRIPTION, COL_NCM, COL_ORACLE_PN};
use crate::models::{IncompleteRow, FACTOR_COLUMNS};
use crate::table::Table;

/// 系数完整性检查结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletenessReport {
    pub complete: usize,
    pub incomplete: Vec<IncompleteRow>,
}

/// 任一系数 (Fator 18/12/7/4) 去空白后为空即视为不完整
pub fn check_completeness(table: &Table, source: &str) -> Result<CompletenessReport, SyncError> {
    let oracle_idx = table.require_column(COL_ORACLE_PN, source)?;
    let desc_idx = table.require_column(COL_DESCRIPTION, source)?;
    let ncm_idx = table.require_column(COL_NCM, source)?;
    let factor_idx = FACTOR_COLUMNS
        .iter()
        .map(|name| table.require_column(name, source))
        .collect::<Result<Vec<_>, _>>()?;

    let mut report = CompletenessReport::default();
    for row in &table.rows {
        if factor_idx.iter().any(|&idx| row[idx].trim().is_empty()) {
            report.incomplete.push(IncompleteRow {
                oracle_pn: row[oracle_idx].clone(),
                description: row[desc_idx].clone(),
                ncm: row[ncm_idx].clone(),
            });
        } else {
            report.complete += 1;
        }
    }

    Ok(report)
}

pub struct CompletenessChecker {
    files: FilesConfig,
}

impl CompletenessChecker {
    pub fn new(files: FilesConfig) -> Self {
        Self { files }
    }

    pub fn run(&self) -> Result<CompletenessReport, SyncError> {
        let input_path = self.files.updated_quotation_path();
        tracing::info!("Loading {}", input_path.display());
        let table = Table::read(&input_path, self.files.delimiter_byte())?;
        tracing::info!("Total rows: {}", table.len());

        tracing::info!("Checking NCMs without factors...");
        let report = check_completeness(&table, &self.files.updated_quotation)?;
        tracing::info!("NCMs with every factor: {}", report.complete);
        tracing::info!("NCMs missing a factor: {}", report.incomplete.len());

        if report.incomplete.is_empty() {
            tracing::info!("Every NCM has its factors filled in");
            return Ok(report);
        }

        let output_path = self.files.missing_factors_report_path();
        export::export_incomplete_rows(&report.incomplete, &output_path)?;
        tracing::info!("Missing-factor report saved to {}", output_path.display());

        tracing::info!("First 10 NCMs without factors:");
        for row in report.incomplete.iter().take(10) {
            tracing::info!("  NCM: {} | OraclePN: {}", row.ncm, row.oracle_pn);
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[[&str; 7]]) -> Table {
        let headers = ["OraclePN", "PT Description", "NCM", "Fator 18", "Fator 12", "Fator 7", "Fator 4"];
        let mut table = Table::new(headers.iter().map(|s| s.to_string()).collect());
        for r in rows {
            table.rows.push(r.iter().map(|s| s.to_string()).collect());
        }
        table
    }

    #[test]
    fn blank_factor_18_is_incomplete() {
        let t = table(&[["A1", "Filter X", "4202", "", "1,1", "1,2", "1,3"]]);
        let report = check_completeness(&t, "q").unwrap();

        assert_eq!(report.complete, 0);
        assert_eq!(
            report.incomplete,
            vec![IncompleteRow {
                oracle_pn: "A1".to_string(),
                description: "Filter X".to_string(),
                ncm: "4202".to_string(),
            }]
        );
    }

    #[test]
    fn whitespace_only_factor_is_blank() {
        let t = table(&[["A1", "Filter X", "4202", "10,5", "1,1", "  ", "1,3"]]);
        assert_eq!(check_completeness(&t, "q").unwrap().incomplete.len(), 1);
    }

    #[test]
    fn all_factors_filled_is_complete() {
        let t = table(&[
            ["A1", "Filter X", "4202", "10,5", "1,1", "1,2", "1,3"],
            ["B1", "Hose", "7307", "0", "0", "0", "0"],
        ]);
        let report = check_completeness(&t, "q").unwrap();
        assert_eq!(report.complete, 2);
        assert!(report.incomplete.is_empty());
    }

    #[test]
    fn missing_factor_column_is_fatal() {
        let t = Table::new(vec!["OraclePN".to_string(), "PT Description".to_string(), "NCM".to_string()]);
        assert!(matches!(
            check_completeness(&t, "q"),
            Err(SyncError::MissingColumn { ref column, .. }) if column == "Fator 18"
        ));
    }
}
