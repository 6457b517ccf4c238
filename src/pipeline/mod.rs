// Extract -> transform -> load for the Redfin market tracker

pub mod artifact;
pub mod chunked;
pub mod dataset;
pub mod normalize;
pub mod steps;

pub use dataset::NormalizedDataset;
pub use normalize::NormalizedRow;
