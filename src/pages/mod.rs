pub mod cart;
pub mod login;
pub mod search;

pub use cart::{CartPage, ItemOutcome};
pub use login::LoginPage;
pub use search::SearchPage;
