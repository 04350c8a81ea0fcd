pub mod compatibility;
pub mod product;
