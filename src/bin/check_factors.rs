use ncm_quotation_sync::service::CompletenessChecker;
use ncm_quotation_sync::{logging, AppConfig, SyncError};
use tracing::{error, info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config = AppConfig::load()?;
    info!("{}", "=".repeat(60));
    info!("CHECKING NCMs WITHOUT FACTORS");
    info!("{}", "=".repeat(60));

    let checker = CompletenessChecker::new(config.files);
    match checker.run() {
        Ok(_) => {}
        Err(SyncError::MissingInput(path)) => {
            error!("Input file not found: {}", path.display());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }

    info!("{}", "=".repeat(60));
    info!("CHECK FINISHED");
    info!("{}", "=".repeat(60));
    Ok(())
}
