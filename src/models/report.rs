use std::fmt;

/// 对照表中的行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    /// NCM 命中主数据, 料号与描述已更新
    Updated,
    /// 未命中, 原样保留
    Kept,
    /// 主数据新增的 NCM, 追加为新行
    Added,
}

impl RowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Updated => "ATUALIZADO",
            Self::Kept => "MANTIDO",
            Self::Added => "ADICIONADO",
        }
    }
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 对照表 (Comparacao_NCMs) 一行: 原值 vs 新值
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub ncm: String,
    pub status: RowStatus,
    pub microsiga_pn_original: String,
    pub microsiga_pn_new: String,
    pub oracle_pn_original: String,
    pub oracle_pn_new: String,
    pub description_original: String,
    pub description_new: String,
}

impl AuditEntry {
    pub const HEADERS: [&'static str; 8] = [
        "NCM",
        "Status",
        "MicrosigaPN_Original",
        "MicrosigaPN_Novo",
        "OraclePN_Original",
        "OraclePN_Novo",
        "Descricao_Original",
        "Descricao_Nova",
    ];

    pub fn to_record(&self) -> [&str; 8] {
        [
            &self.ncm,
            self.status.as_str(),
            &self.microsiga_pn_original,
            &self.microsiga_pn_new,
            &self.oracle_pn_original,
            &self.oracle_pn_new,
            &self.description_original,
            &self.description_new,
        ]
    }
}

/// 仅存在于商品主数据的 NCM (报价表中没有系数)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmatchedItem {
    pub ncm: String,
    pub item_code: String,
    /// 共享该 NCM 的商品行数
    pub item_rows: usize,
}

/// 缺少任一系数的报价行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncompleteRow {
    pub oracle_pn: String,
    pub description: String,
    pub ncm: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_tags_match_comparison_file_values() {
        assert_eq!(RowStatus::Updated.to_string(), "ATUALIZADO");
        assert_eq!(RowStatus::Kept.to_string(), "MANTIDO");
        assert_eq!(RowStatus::Added.to_string(), "ADICIONADO");
    }
}
