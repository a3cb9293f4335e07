//! Response views
//!
//! Every record leaves the API through one of these structs. They copy
//! fields explicitly so nothing stored is exposed by accident; the user
//! view in particular has no password hash.

pub mod company;
pub mod item;
pub mod order;
pub mod user;

pub use company::CompanyView;
pub use item::ItemView;
pub use order::OrderView;
pub use user::{UserSummary, UserView};
