pub mod inventory_record;
pub mod print_request;
pub mod settings;
pub mod snapshot;
