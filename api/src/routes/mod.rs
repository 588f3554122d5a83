pub mod chat;
pub mod knowledge;
pub mod session;
