pub mod print_requests;
pub mod search;
pub mod settings;
pub mod snapshots;
