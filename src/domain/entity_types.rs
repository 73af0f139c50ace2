// NGSI entity types the shipped boards read
pub const ROUGHNESS_ESTIMATE_TYPE: &str = "RoughnessEstimate";
pub const INSPECTION_DEMO_TYPE: &str = "InspectionDemo";
pub const RAW_MATERIAL_INSPECTION_TYPE: &str = "Raw_Material";
pub const TWEEZERS_INSPECTION_TYPE: &str = "Tweezers";
