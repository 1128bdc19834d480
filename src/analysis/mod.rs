pub mod aggregate;
pub mod percentile;
pub mod table;
