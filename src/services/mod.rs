pub mod catalog;
pub mod edit_tracker;
pub mod gateway;
pub mod roster;
pub mod save_orchestrator;
pub mod session;
