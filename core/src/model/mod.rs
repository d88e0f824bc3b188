// solecart/src/model/mod.rs

//! Data structures exchanged with the cart service and shown by the cart screen.

pub mod cart_line;
pub mod page;
pub mod summary;

pub use cart_line::{CartLine, LineId, LineUpdate, ProductId, SizeId};
pub use page::{CartPage, Pagination};
pub use summary::CartSummary;
