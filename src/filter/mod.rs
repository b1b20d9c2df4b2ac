pub mod types;
pub mod filter_order;
pub mod pagination;
pub mod error;

pub use types::*;
pub use filter_order::FilterOrder;
pub use pagination::{PageInfo, Pagination};
pub use error::FilterError;
