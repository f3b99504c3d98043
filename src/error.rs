use std::path::PathBuf;
use thiserror::Error;

/// 同步流程统一错误类型
#[derive(Error, Debug)]
pub enum SyncError {
    /// 输入文件不存在 (流程在处理前终止)
    #[error("input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 缺少必需列
    #[error("{file}: missing required column '{column}'")]
    MissingColumn { file: String, column: String },

    /// 数据行字段数超过表头
    #[error("{file}: line {line} has {found} fields, header has {expected}")]
    MalformedRow {
        file: String,
        line: u64,
        found: usize,
        expected: usize,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl SyncError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_column_names_file_and_column() {
        let err = SyncError::MissingColumn {
            file: "item_extract.csv".to_string(),
            column: "NCM".to_string(),
        };
        assert_eq!(err.to_string(), "item_extract.csv: missing required column 'NCM'");
    }
}
