use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub files: FilesConfig,
    pub database: DatabaseConfig,
    pub loader: LoaderConfig,
}

/// 文件路径配置 (均相对于 base_dir)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    pub base_dir: PathBuf,
    pub delimiter: String,
    pub item_extract: String,
    pub quotation_base: String,
    pub updated_quotation: String,
    pub comparison: String,
    pub unmatched_report: String,
    pub missing_factors_report: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub slow_statement_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// 每插入多少行提交一次事务
    pub commit_every: usize,
    /// 最终报告中列出的错误条数
    pub error_preview: usize,
    pub insert_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            files: FilesConfig {
                base_dir: PathBuf::from("."),
                delimiter: ";".to_string(),
                item_extract: "item_extract.csv".to_string(),
                quotation_base: "Quotation_baseCalc.csv".to_string(),
                updated_quotation: "Quotation_baseCalc_ATUALIZADO.csv".to_string(),
                comparison: "Comparacao_NCMs.csv".to_string(),
                unmatched_report: "NCMs_com_erro.xlsx".to_string(),
                missing_factors_report: "NCMs_sem_fatores.xlsx".to_string(),
            },
            database: DatabaseConfig {
                url: "mysql://root@localhost:3306/quotations".to_string(),
                max_connections: 2,
                acquire_timeout_secs: 10,
                slow_statement_secs: 5,
            },
            loader: LoaderConfig {
                commit_every: 1000,
                error_preview: 10,
                insert_timeout_secs: 30,
            },
        }
    }
}

impl AppConfig {
    /// 加载配置: 默认值 < quotation-sync.{toml,yaml,json} < QSYNC_* 环境变量 < DATABASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(File::with_name("quotation-sync").required(false))
            .add_source(
                Environment::with_prefix("QSYNC")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .build()?
            .try_deserialize()
    }
}

impl FilesConfig {
    /// 字段分隔符 (取配置的第一个字节, 默认 ';')
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter.bytes().next().unwrap_or(b';')
    }

    pub fn item_extract_path(&self) -> PathBuf {
        self.base_dir.join(&self.item_extract)
    }

    pub fn quotation_base_path(&self) -> PathBuf {
        self.base_dir.join(&self.quotation_base)
    }

    pub fn updated_quotation_path(&self) -> PathBuf {
        self.base_dir.join(&self.updated_quotation)
    }

    pub fn comparison_path(&self) -> PathBuf {
        self.base_dir.join(&self.comparison)
    }

    pub fn unmatched_report_path(&self) -> PathBuf {
        self.base_dir.join(&self.unmatched_report)
    }

    pub fn missing_factors_report_path(&self) -> PathBuf {
        self.base_dir.join(&self.missing_factors_report)
    }
}
