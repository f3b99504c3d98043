use crate::error::SyncError;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// 内存中的分隔符文本表: 表头 + 文本单元格行
///
/// 所有字段均按文本读取, 不做任何数值推断; 未知列原样保留。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// 从文件读取; 文件不存在时返回 `SyncError::MissingInput`
    pub fn read(path: &Path, delimiter: u8) -> Result<Self, SyncError> {
        if !path.exists() {
            return Err(SyncError::MissingInput(path.to_path_buf()));
        }
        let file = File::open(path).map_err(|e| SyncError::io(path, e))?;
        Self::from_reader(file, delimiter, &path.display().to_string())
    }

    /// 从任意 reader 读取, `source` 仅用于错误信息
    pub fn from_reader<R: Read>(reader: R, delimiter: u8, source: &str) -> Result<Self, SyncError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let width = headers.len();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            if record.len() > width {
                return Err(SyncError::MalformedRow {
                    file: source.to_string(),
                    line: record.position().map(|p| p.line()).unwrap_or_default(),
                    found: record.len(),
                    expected: width,
                });
            }
            // 短行补空
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(width, String::new());
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn require_column(&self, name: &str, source: &str) -> Result<usize, SyncError> {
        self.column(name).ok_or_else(|| SyncError::MissingColumn {
            file: source.to_string(),
            column: name.to_string(),
        })
    }

    /// 追加一行全空的记录, 返回其可变引用
    pub fn push_blank_row(&mut self) -> &mut Vec<String> {
        self.rows.push(vec![String::new(); self.headers.len()]);
        let last = self.rows.len() - 1;
        &mut self.rows[last]
    }

    pub fn write(&self, path: &Path, delimiter: u8) -> Result<(), SyncError> {
        let file = File::create(path).map_err(|e| SyncError::io(path, e))?;
        self.to_writer(file, delimiter)
    }

    pub fn to_writer<W: Write>(&self, writer: W, delimiter: u8) -> Result<(), SyncError> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);

        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}
