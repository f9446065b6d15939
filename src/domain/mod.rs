pub mod product;
pub mod record;

pub use product::*;
pub use record::ProductRecord;
