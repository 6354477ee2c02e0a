pub mod credentials;
pub mod staging;
pub mod storage;
pub mod transfer;
