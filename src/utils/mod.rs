pub mod filter;
pub mod log;

pub use filter::NameFilter;
