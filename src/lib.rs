pub mod contract;
pub mod grade;
pub mod models;
pub mod names;
pub mod report;
pub mod store;
pub mod validate;
