pub mod interpreter;
pub mod spec;

pub use interpreter::QueryInterpreter;
pub use spec::{CategoryFilter, DateFilter, DateSort, FilterSpec, PriceSort};
