// Dashboard boards shipped with the service
mod entities_frame;
mod entity_monitor;

pub use entities_frame::EntitiesFrameBoard;
pub use entity_monitor::EntityMonitorBoard;

use crate::application::board_catalog::BoardCatalog;
use crate::domain::entity_types::{
    INSPECTION_DEMO_TYPE, RAW_MATERIAL_INSPECTION_TYPE, ROUGHNESS_ESTIMATE_TYPE,
    TWEEZERS_INSPECTION_TYPE,
};

const ROUGHNESS_EXPLANATION: &str = "\
Plots how **acceleration** and the **roughness** estimate computed for the \
selected milling machine change over time.

The graph refreshes every few seconds. Load the IDs of the connected machines, \
pick one, and optionally set how many of the latest data points to show.";

const INSPECTION_EXPLANATION: &str = "\
Shows inspection reports as they arrive. Each bubble is a surface area of the \
machined part where a defect may be; its size follows the size of the area and \
highlighted bubbles mark likely defects.

The graph refreshes every few seconds. Load the report IDs, pick one, and \
optionally set how many of the latest data points to show.";

const RAW_MATERIAL_EXPLANATION: &str = "\
Shows the raw material inspections done in the chosen time window, one bar per \
inspected item. The bar is how far the item is from its spec: zero means no \
significant deviation, one means the item is probably scrap. Highlighted bars \
are above the spec's conformance threshold.

Pick the start and end of the window, then load the entities.";

const TWEEZERS_EXPLANATION: &str = "\
Shows the tweezers inspections done in the chosen time window, one bar per \
inspected pair. The bar is how far the pair is from its spec: zero means no \
significant deviation, one means it is probably scrap. Highlighted bars are \
above the spec's conformance threshold; hover a bar to see which spec the \
pair was checked against.

Pick the start and end of the window, then load the entities.";

/// Every board the service can mount, by the name settings refer to it with.
pub fn catalog() -> BoardCatalog {
    let mut catalog = BoardCatalog::new();
    catalog
        .register(
            "roughnator",
            EntityMonitorBoard::new("Surface Roughness", ROUGHNESS_ESTIMATE_TYPE, ROUGHNESS_EXPLANATION),
        )
        .register(
            "inspection_demo",
            EntityMonitorBoard::new("Defect Size", INSPECTION_DEMO_TYPE, INSPECTION_EXPLANATION),
        )
        .register(
            "raw_material",
            EntitiesFrameBoard::new(
                "Raw Material Inspection",
                RAW_MATERIAL_INSPECTION_TYPE,
                RAW_MATERIAL_EXPLANATION,
            ),
        )
        .register(
            "tweezers",
            EntitiesFrameBoard::new("Tweezers Inspection", TWEEZERS_INSPECTION_TYPE, TWEEZERS_EXPLANATION),
        );
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_names() {
        let catalog = catalog();
        assert_eq!(
            catalog.names().collect::<Vec<_>>(),
            vec!["inspection_demo", "raw_material", "roughnator", "tweezers"]
        );
    }
}
