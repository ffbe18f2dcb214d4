pub mod parameters;
pub mod states;
