pub mod backend_api;
pub mod draft_store;
