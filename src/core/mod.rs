pub mod chat_task;
pub mod config;
pub mod constants;
pub mod conversation;
pub mod history;
pub mod message;
