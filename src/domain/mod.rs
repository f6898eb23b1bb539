// Domain layer: report payload, workbook grid, plan and schema models, and the ports the adapters implement.

pub mod lenient;
pub mod model;
pub mod plan;
pub mod ports;
pub mod schema;
pub mod workbook;
