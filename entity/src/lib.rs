//! Wire types for the employee directory API.
//!
//! Everything here mirrors the JSON the backend speaks (camelCase keys,
//! upper-case enum names). No validation happens client-side.

pub mod criteria;
pub mod employee;
pub mod statistics;

pub use criteria::SearchCriteria;
pub use employee::{Employee, EmployeeType, UnknownVariant, WorkDay};
pub use statistics::{DepartmentStatistics, EmployeeStatistics};
