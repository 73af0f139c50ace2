// Application layer - Dashboard assembly and data access seams
pub mod board_catalog;
pub mod dashboard;
pub mod mount_registry;
pub mod timeseries_source;
