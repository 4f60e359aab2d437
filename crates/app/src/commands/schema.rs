use budgetlink_core::{Catalog, NodeSchema};

/// Resources, operations and fields exposed to host UIs
pub fn node_schema() -> NodeSchema {
    Catalog::standard().schema()
}
