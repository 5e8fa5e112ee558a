pub mod access;
pub mod contract;
pub mod handlers;
pub mod registry;
pub mod rental;
pub mod scheduler;
pub mod wallet;
