//! Front end of the hospital employee directory.
//!
//! The [`controller::DirectoryController`] owns the view model and drives
//! [`platform_api::EmployeeClient`]; [`view`] turns the model into text.

pub mod config;
pub mod controller;
pub mod draft;
pub mod shell;
pub mod view;

pub use config::AppConfig;
pub use controller::{DirectoryController, DirectoryView, Notice};
pub use draft::{DraftError, EmployeeDraft};
