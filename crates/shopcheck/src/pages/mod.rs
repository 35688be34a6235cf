//! Page objects, one per storefront screen.
//!
//! Each page object borrows the [`Session`](crate::Session) and owns its
//! locators as associated constants. Construct a page object for the screen
//! that is currently shown; navigation does not rebind existing ones.

mod cart;
mod home;
mod login;
mod product;

pub use cart::CartPage;
pub use home::{HomePage, SortOrder};
pub use login::LoginPage;
pub use product::ProductPage;
