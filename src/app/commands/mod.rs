pub mod serve;
pub mod init_db;
