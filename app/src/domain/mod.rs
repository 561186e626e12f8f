// foodtruck/src/domain/mod.rs

//! Pure ordering logic shared by the HTTP layer and the pipelines.

pub mod cart;
pub mod slots;
pub mod tax;
pub mod wizard;

pub use cart::{Cart, CartLine};
pub use tax::{calculate_tax, tax_rate};
pub use wizard::{OrderWizard, SubmitOrderLine, SubmitOrderRequest, WizardError, WizardStage};
