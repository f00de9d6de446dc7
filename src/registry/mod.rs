//! Registry document model, store, and validation.
//!
//! - `types` - The registry document (`Registry`, `Service`, `Healthcheck`)
//! - `store` - Loading/saving plus pure helpers shared by the generators
//! - `validation` - The schema validator (`validate`, `ValidationReport`)

mod store;
mod types;
mod validation;

pub use store::*;
pub use types::*;
pub use validation::*;
