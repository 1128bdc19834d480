pub mod access;
pub mod builder;
pub mod client;
pub mod collector;
pub mod policy;
pub mod queue;
pub mod runner;
