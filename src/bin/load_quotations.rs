use ncm_quotation_sync::db::MySqlQuotationStore;
use ncm_quotation_sync::service::{QuotationLoader, StdinConfirmation};
use ncm_quotation_sync::{create_pool, logging, AppConfig, SyncError, Table};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config = AppConfig::load()?;
    info!("{}", "=".repeat(70));
    info!("UPLOADING UPDATED QUOTATION BASE TO THE DATABASE");
    info!("{}", "=".repeat(70));

    // 1. 加载 CSV
    let input_path = config.files.updated_quotation_path();
    info!("Loading {}", input_path.display());
    let table = match Table::read(&input_path, config.files.delimiter_byte()) {
        Ok(table) => table,
        Err(SyncError::MissingInput(path)) => {
            error!("Input file not found: {}", path.display());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    info!("Rows in CSV: {}", table.len());

    // 2. 连接数据库
    info!("Connecting to the database...");
    let pool = match create_pool(&config.database).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to connect to the database: {}", e);
            return Ok(());
        }
    };
    info!("Database pool created");

    // 3. 确认后导入
    let store = MySqlQuotationStore::new(pool.clone());
    let mut loader = QuotationLoader::new(store, StdinConfirmation, config.loader.clone());
    let result = loader.load(&table, &config.files.updated_quotation).await;

    pool.close().await;
    info!("Database connection closed");

    loader.finish(result)?;
    info!("{}", "=".repeat(70));
    info!("UPLOAD FINISHED");
    info!("{}", "=".repeat(70));

    Ok(())
}
