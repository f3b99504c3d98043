pub mod checker;
pub mod confirm;
pub mod loader;
pub mod reconciler;

pub use checker::{check_completeness, CompletenessChecker, CompletenessReport};
pub use confirm::{Confirmation, FixedAnswer, StdinConfirmation};
pub use loader::{LoadOutcome, LoadReport, QuotationLoader, RowFailure};
pub use reconciler::{reconcile, KeySets, ReconcileStats, Reconciliation, ReconcilerService};
