use crate::error::SyncError;
use crate::models::{AuditEntry, IncompleteRow, UnmatchedItem};
use rust_xlsxwriter::{Format, Workbook};
use std::fs::File;
use std::path::Path;

pub const UNMATCHED_SHEET: &str = "NCMs_com_erro";
pub const UNMATCHED_HEADERS: [&str; 2] = ["NCM", "COD_ITEM"];

pub const MISSING_FACTORS_SHEET: &str = "NCMs_sem_fatores";
pub const MISSING_FACTORS_HEADERS: [&str; 3] = ["OraclePN", "PT Description", "NCM"];

/// 导出对照表 (分隔符文本, 带表头)
pub fn export_audit_csv(entries: &[AuditEntry], output_path: &Path, delimiter: u8) -> Result<(), SyncError> {
    let file = File::create(output_path).map_err(|e| SyncError::io(output_path, e))?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(file);

    writer.write_record(AuditEntry::HEADERS)?;
    for entry in entries {
        writer.write_record(entry.to_record())?;
    }

    writer.flush().map_err(|e| SyncError::io(output_path, e))?;
    Ok(())
}

/// 导出仅存在于主数据的 NCM 清单 (Excel)
pub fn export_unmatched_items(items: &[UnmatchedItem], output_path: &Path) -> Result<(), SyncError> {
    let rows = items
        .iter()
        .map(|item| vec![item.ncm.as_str(), item.item_code.as_str()]);
    write_sheet(output_path, UNMATCHED_SHEET, &UNMATCHED_HEADERS, rows)
}

/// 导出缺少系数的报价行 (Excel)
pub fn export_incomplete_rows(rows: &[IncompleteRow], output_path: &Path) -> Result<(), SyncError> {
    let rows = rows
        .iter()
        .map(|row| vec![row.oracle_pn.as_str(), row.description.as_str(), row.ncm.as_str()]);
    write_sheet(output_path, MISSING_FACTORS_SHEET, &MISSING_FACTORS_HEADERS, rows)
}

/// 单工作表导出: 粗体表头 + 文本单元格
fn write_sheet<'a, I>(output_path: &Path, sheet_name: &str, headers: &[&str], rows: I) -> Result<(), SyncError>
where
    I: Iterator<Item = Vec<&'a str>>,
{
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (idx, cells) in rows.enumerate() {
        let row = (idx + 1) as u32;
        for (col, value) in cells.into_iter().enumerate() {
            // 空单元格不写入
            if !value.is_empty() {
                worksheet.write_string(row, col as u16, value)?;
            }
        }
    }

    workbook.save(output_path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RowStatus;
    use crate::table::Table;
    use calamine::{open_workbook_auto, Data, Reader};
    use tempfile::TempDir;

    #[test]
    fn audit_csv_has_fixed_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Comparacao_NCMs.csv");
        let entries = vec![AuditEntry {
            ncm: "4202".to_string(),
            status: RowStatus::Updated,
            microsiga_pn_original: "OLD".to_string(),
            microsiga_pn_new: "A1".to_string(),
            oracle_pn_original: "OLD".to_string(),
            oracle_pn_new: "A1".to_string(),
            description_original: "Old filter".to_string(),
            description_new: "Filter X".to_string(),
        }];

        export_audit_csv(&entries, &path, b';').unwrap();

        let table = Table::read(&path, b';').unwrap();
        assert_eq!(table.headers, AuditEntry::HEADERS.to_vec());
        assert_eq!(table.rows[0][1], "ATUALIZADO");
        assert_eq!(table.rows[0][3], "A1");
    }

    #[test]
    fn unmatched_items_sheet_reads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("NCMs_com_erro.xlsx");
        let items = vec![UnmatchedItem {
            ncm: "8888".to_string(),
            item_code: "Z9".to_string(),
            item_rows: 3,
        }];

        export_unmatched_items(&items, &path).unwrap();

        let mut workbook = open_workbook_auto(&path).unwrap();
        let range = workbook.worksheet_range(UNMATCHED_SHEET).unwrap();
        assert_eq!(range.get_value((0, 0)), Some(&Data::String("NCM".to_string())));
        assert_eq!(range.get_value((0, 1)), Some(&Data::String("COD_ITEM".to_string())));
        assert_eq!(range.get_value((1, 0)), Some(&Data::String("8888".to_string())));
        assert_eq!(range.get_value((1, 1)), Some(&Data::String("Z9".to_string())));
    }

    #[test]
    fn empty_report_still_has_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("NCMs_sem_fatores.xlsx");

        export_incomplete_rows(&[], &path).unwrap();

        let mut workbook = open_workbook_auto(&path).unwrap();
        let range = workbook.worksheet_range(MISSING_FACTORS_SHEET).unwrap();
        assert_eq!(range.height(), 1);
        assert_eq!(range.get_value((0, 2)), Some(&Data::String("NCM".to_string())));
    }
}
