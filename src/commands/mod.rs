mod report;
mod scan;
mod sync;
mod validate;

pub use report::run_report;
pub use scan::run_scan;
pub use sync::run_sync;
pub use validate::run_validate;
