pub mod catalog;
pub mod datatypes;
pub mod error;
pub mod operators;
pub mod range;
pub mod selectivity;
pub mod statistics;
pub mod value;
#[cfg(test)]
pub mod testing;
#[cfg(test)]
mod tests;
