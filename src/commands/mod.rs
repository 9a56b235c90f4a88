pub mod export;
pub mod health;
pub mod init;
pub mod load;
