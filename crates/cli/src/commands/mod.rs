pub mod chat;
pub mod init;
pub mod status;
pub mod submit;
