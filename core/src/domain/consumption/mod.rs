pub mod entities;
pub mod validators;
pub mod value_objects;
