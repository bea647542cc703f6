pub mod aggregate;
pub mod catalog;
pub mod compliance;
pub mod decay;
pub mod dilution;
pub mod error;
pub mod logger;
pub mod normalize;
pub mod report;
pub mod spark;
