pub mod form;
pub mod sanitize;
pub mod serialize;
pub mod solver;
pub mod validate;
