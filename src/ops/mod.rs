pub mod dashboard;
pub mod filter;
pub mod progress;
pub mod reducer;

pub use reducer::reduce;
