pub mod store;

pub use store::{FileTokenStore, StoreError, TokenStorage, TOKEN_KEY};
