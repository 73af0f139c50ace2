// Domain layer - Addresses, tenant scopes and time series
pub mod entity_types;
pub mod fiware;
pub mod inspection_report;
pub mod path_address;
pub mod series;
