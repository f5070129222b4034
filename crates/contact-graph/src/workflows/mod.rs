pub mod connections;
pub mod network;
