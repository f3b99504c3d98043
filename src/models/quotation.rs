use crate::error::SyncError;
use crate::table::Table;
use bigdecimal::BigDecimal;
use std::str::FromStr;

pub const COL_MICROSIGA_PN: &str = "MicrosigaPN";
pub const COL_ORACLE_PN: &str = "OraclePN";
pub const COL_DESCRIPTION: &str = "PT Description";
pub const COL_NCM: &str = "NCM";
pub const COL_IPI: &str = "IPI";
pub const COL_PIS: &str = "PIS";
pub const COL_COFINS: &str = "COFINS";
pub const COL_FACTOR_18: &str = "Fator 18";
pub const COL_FACTOR_12: &str = "Fator 12";
pub const COL_FACTOR_7: &str = "Fator 7";
pub const COL_FACTOR_4: &str = "Fator 4";

/// 完整性检查所需的四个系数列
pub const FACTOR_COLUMNS: [&str; 4] = [COL_FACTOR_18, COL_FACTOR_12, COL_FACTOR_7, COL_FACTOR_4];

/// 报价基础表各列在表头中的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotationColumns {
    pub microsiga_pn: usize,
    pub oracle_pn: usize,
    pub description: usize,
    pub ncm: usize,
    pub ipi: usize,
    pub pis: usize,
    pub cofins: usize,
    pub factor_18: usize,
    pub factor_12: usize,
    pub factor_7: usize,
    pub factor_4: usize,
}

impl QuotationColumns {
    /// 定位全部 11 个已知列, 任一缺失即失败
    pub fn locate(table: &Table, source: &str) -> Result<Self, SyncError> {
        Ok(Self {
            microsiga_pn: table.require_column(COL_MICROSIGA_PN, source)?,
            oracle_pn: table.require_column(COL_ORACLE_PN, source)?,
            description: table.require_column(COL_DESCRIPTION, source)?,
            ncm: table.require_column(COL_NCM, source)?,
            ipi: table.require_column(COL_IPI, source)?,
            pis: table.require_column(COL_PIS, source)?,
            cofins: table.require_column(COL_COFINS, source)?,
            factor_18: table.require_column(COL_FACTOR_18, source)?,
            factor_12: table.require_column(COL_FACTOR_12, source)?,
            factor_7: table.require_column(COL_FACTOR_7, source)?,
            factor_4: table.require_column(COL_FACTOR_4, source)?,
        })
    }
}

/// 写入 quotations 表的一行 (已完成类型转换)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuotationRow {
    pub microsiga_pn: Option<String>,
    pub oracle_pn: Option<String>,
    pub pt_description: Option<String>,
    pub ncm: Option<String>,
    pub ipi: Option<BigDecimal>,
    pub pis: Option<BigDecimal>,
    pub cofins: Option<BigDecimal>,
    pub fator_18: Option<BigDecimal>,
    pub fator_12: Option<BigDecimal>,
    pub fator_7: Option<BigDecimal>,
    pub fator_4: Option<BigDecimal>,
}

impl QuotationRow {
    pub fn from_cells(row: &[String], cols: &QuotationColumns) -> Self {
        Self {
            microsiga_pn: clean_text(&row[cols.microsiga_pn]),
            oracle_pn: clean_text(&row[cols.oracle_pn]),
            pt_description: clean_text(&row[cols.description]),
            ncm: clean_text(&row[cols.ncm]),
            ipi: parse_decimal(&row[cols.ipi]),
            pis: parse_decimal(&row[cols.pis]),
            cofins: parse_decimal(&row[cols.cofins]),
            fator_18: parse_decimal(&row[cols.factor_18]),
            fator_12: parse_decimal(&row[cols.factor_12]),
            fator_7: parse_decimal(&row[cols.factor_7]),
            fator_4: parse_decimal(&row[cols.factor_4]),
        }
    }
}

/// 文本字段: 去空白, 空串转为 None
pub fn clean_text(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// 十进制字段: 逗号视为小数点; 空值或无法解析时为 None
pub fn parse_decimal(raw: &str) -> Option<BigDecimal> {
    let value = raw.trim().replace(',', ".");
    if value.is_empty() {
        return None;
    }
    BigDecimal::from_str(&value).ok()
}
