use ncm_quotation_sync::service::ReconcilerService;
use ncm_quotation_sync::{logging, AppConfig, SyncError};
use tracing::{error, info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config = AppConfig::load()?;
    info!("{}", "=".repeat(80));
    info!("STARTING ITEM EXTRACT -> QUOTATION BASE RECONCILIATION");
    info!("{}", "=".repeat(80));

    let service = ReconcilerService::new(config.files);
    match service.run() {
        Ok(stats) => {
            info!("{}", "=".repeat(80));
            info!(
                "RECONCILIATION FINISHED: {} rows in, {} rows out ({} updated, {} removed, {} added)",
                stats.quotation_rows, stats.output_rows, stats.updated, stats.removed, stats.added
            );
            info!("{}", "=".repeat(80));
            Ok(())
        }
        Err(SyncError::MissingInput(path)) => {
            error!("Input file not found: {}", path.display());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
