pub mod bot_guard;
pub mod security_headers;
