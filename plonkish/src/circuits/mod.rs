pub mod assignment;
pub mod column;
pub mod constraint_system;
pub mod domains;
pub mod expr;
pub mod query;
pub mod selector_compressor;
pub mod value;
