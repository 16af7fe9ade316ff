pub mod annotation;
pub mod dataset;
pub mod index;
pub mod label;
