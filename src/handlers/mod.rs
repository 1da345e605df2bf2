// Main handlers (system/health handlers)
pub mod main_handlers;
pub use main_handlers::AppState;

// Q&A browse/search/stats handlers
pub mod qa_handlers;

// Reply handlers module
pub mod reply_handlers;

// User/auth handlers module
pub mod user_handlers;
