use std::fs;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use ncm_quotation_sync::config::FilesConfig;
use ncm_quotation_sync::models::ItemCatalog;
use ncm_quotation_sync::service::{reconcile, CompletenessChecker, ReconcilerService};
use ncm_quotation_sync::{AppConfig, SyncError, Table};
use tempfile::TempDir;

const ITEM_EXTRACT: &str = "\
COD_ITEM;DESCRICAO;NCM;UNIDADE
A1;Filter X;4202;PC
A2;Filter X duplicate;04202;PC
B1; Hose ;7307;M
C1;No NCM;;PC
Z9;Gasket;8888;PC
";

const QUOTATION_BASE: &str = "\
MicrosigaPN;OraclePN;PT Description;NCM;IPI;PIS;COFINS;Fator 18;Fator 12;Fator 7;Fator 4;Obs
OLD1;OLD1;Old filter;04202;5;1,65;7,6;10,5;1,1;1,2;1,3;keep me
OLD2;OLD2;Old hose;7307;0;1,65;7,6;9,1;;1,2;1,3;
OLD3;OLD3;Obsolete;9999;0;1,65;7,6;1;1;1;1;
";

fn files_in(dir: &Path) -> FilesConfig {
    let mut files = AppConfig::default().files;
    files.base_dir = dir.to_path_buf();
    files
}

fn setup() -> (TempDir, FilesConfig) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("item_extract.csv"), ITEM_EXTRACT).unwrap();
    fs::write(dir.path().join("Quotation_baseCalc.csv"), QUOTATION_BASE).unwrap();
    let files = files_in(dir.path());
    (dir, files)
}

fn row_for<'a>(table: &'a Table, ncm: &str) -> &'a Vec<String> {
    let idx = table.column("NCM").unwrap();
    table.rows.iter().find(|r| r[idx] == ncm).unwrap()
}

#[test]
fn reconcile_writes_all_outputs() {
    let (_dir, files) = setup();

    let stats = ReconcilerService::new(files.clone()).run().unwrap();

    assert_eq!(stats.quotation_rows, 3);
    assert_eq!(stats.updated, 2);
    assert_eq!(stats.kept, 1);
    assert_eq!(stats.removed, 1);
    assert_eq!(stats.added, 1);
    assert_eq!(stats.output_rows, 3);
    assert_eq!(stats.item_rows, 5);
    assert_eq!(stats.item_rows_with_key, 4);

    let updated = Table::read(&files.updated_quotation_path(), b';').unwrap();
    // 未知列保留
    assert_eq!(updated.headers.last().map(String::as_str), Some("Obs"));

    let filter = row_for(&updated, "4202");
    assert_eq!(filter[..4], ["A1", "A1", "Filter X", "4202"]);
    assert_eq!(filter[7], "10,5");
    assert_eq!(filter[11], "keep me");

    let hose = row_for(&updated, "7307");
    assert_eq!(hose[2], "Hose");

    let gasket = row_for(&updated, "8888");
    assert_eq!(gasket[..4], ["Z9", "Z9", "Gasket", "8888"]);
    assert!(gasket[4..].iter().all(String::is_empty));

    assert!(updated.rows.iter().all(|r| r[3] != "9999"));

    let comparison = Table::read(&files.comparison_path(), b';').unwrap();
    let statuses: Vec<&str> = comparison.rows.iter().map(|r| r[1].as_str()).collect();
    assert_eq!(statuses, vec!["ATUALIZADO", "ATUALIZADO", "MANTIDO", "ADICIONADO"]);

    let mut workbook = open_workbook_auto(files.unmatched_report_path()).unwrap();
    let range = workbook.worksheet_range("NCMs_com_erro").unwrap();
    assert_eq!(range.get_value((1, 0)), Some(&Data::String("8888".to_string())));
    assert_eq!(range.get_value((1, 1)), Some(&Data::String("Z9".to_string())));
}

#[test]
fn row_count_law_holds() {
    let (_dir, files) = setup();
    let items = Table::read(&files.item_extract_path(), b';').unwrap();
    let quotation = Table::read(&files.quotation_base_path(), b';').unwrap();
    let catalog = ItemCatalog::from_table(&items, "items").unwrap();

    let original_rows = quotation.len();
    let result = reconcile(&catalog, quotation, "quotation").unwrap();

    let obsolete_rows = result
        .audit
        .iter()
        .filter(|a| result.keys.quotation_only.contains(&a.ncm))
        .count();
    assert_eq!(
        result.table.len(),
        original_rows - obsolete_rows + result.keys.item_only.len()
    );

    // 输出中的每个 NCM 都属于 matched ∪ item_only
    for row in &result.table.rows {
        let ncm = &row[3];
        assert!(result.keys.matched.contains(ncm) || result.keys.item_only.contains(ncm));
    }
}

#[test]
fn rerun_on_own_output_is_stable() {
    let (_dir, files) = setup();
    let items = Table::read(&files.item_extract_path(), b';').unwrap();
    let catalog = ItemCatalog::from_table(&items, "items").unwrap();

    let quotation = Table::read(&files.quotation_base_path(), b';').unwrap();
    let first = reconcile(&catalog, quotation, "quotation").unwrap();
    let second = reconcile(&catalog, first.table.clone(), "quotation").unwrap();

    assert!(second.keys.quotation_only.is_empty());
    assert!(second.keys.item_only.is_empty());
    assert_eq!(second.stats.added, 0);
    assert_eq!(second.stats.removed, 0);
    assert_eq!(second.table, first.table);
}

#[test]
fn missing_input_aborts_before_writing() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("item_extract.csv"), ITEM_EXTRACT).unwrap();
    let files = files_in(dir.path());

    let err = ReconcilerService::new(files.clone()).run().unwrap_err();

    assert!(matches!(err, SyncError::MissingInput(ref p) if p.ends_with("Quotation_baseCalc.csv")));
    assert!(!files.updated_quotation_path().exists());
}

#[test]
fn missing_item_column_aborts() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("item_extract.csv"), "COD_ITEM;NCM\nA1;4202\n").unwrap();
    fs::write(dir.path().join("Quotation_baseCalc.csv"), QUOTATION_BASE).unwrap();

    let err = ReconcilerService::new(files_in(dir.path())).run().unwrap_err();

    assert!(matches!(err, SyncError::MissingColumn { ref column, .. } if column == "DESCRICAO"));
}

#[test]
fn checker_flags_rows_missing_factors_in_reconciled_output() {
    let (_dir, files) = setup();
    ReconcilerService::new(files.clone()).run().unwrap();

    let report = CompletenessChecker::new(files.clone()).run().unwrap();

    // 7307 缺 Fator 12, 8888 为新增行 (全部为空)
    assert_eq!(report.complete, 1);
    let ncms: Vec<&str> = report.incomplete.iter().map(|r| r.ncm.as_str()).collect();
    assert_eq!(ncms, vec!["7307", "8888"]);

    let mut workbook = open_workbook_auto(files.missing_factors_report_path()).unwrap();
    let range = workbook.worksheet_range("NCMs_sem_fatores").unwrap();
    assert_eq!(range.height(), 3);
    assert_eq!(range.get_value((1, 0)), Some(&Data::String("B1".to_string())));
    assert_eq!(range.get_value((2, 2)), Some(&Data::String("8888".to_string())));
}
