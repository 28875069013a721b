pub mod export_service;
pub mod sale_service;
pub mod summary_service;

pub use export_service::ExportService;
pub use sale_service::{Quote, SaleService};
pub use summary_service::{DaySummary, SummaryService};
