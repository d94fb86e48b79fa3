mod check_inventory;
mod log_incident;
mod search_shelters;

pub use check_inventory::CheckInventoryTool;
pub use log_incident::LogIncidentTool;
pub use search_shelters::SearchSheltersTool;
