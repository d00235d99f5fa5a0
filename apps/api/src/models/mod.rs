pub mod portfolio;
pub mod snapshot;
