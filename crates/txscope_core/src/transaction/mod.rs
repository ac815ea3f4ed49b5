//! Transaction accumulation and scoping.
//!
//! A transaction here is client-side only:
//! - **Accumulation**: writes are recorded in order by a [`TransactionManager`]
//! - **Atomicity**: delegated to the store's atomic multi-item write, called
//!   once on commit
//! - **Scoping**: the active manager is bound to the current call path by
//!   [`TransactionContext`]

mod context;
mod factory;
mod manager;
mod request;

pub use context::{ContextGuard, TransactionContext};
pub use factory::TransactionManagerFactory;
pub use manager::TransactionManager;
pub use request::RequestBuilder;
