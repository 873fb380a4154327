//! services/dashboard/src/stores/mod.rs
//!
//! The async stores. Each store owns a `watch` channel of its state and folds
//! request outcomes through the pure reducers in `admin_dashboard_core`.

pub mod auth;
pub mod products;
pub mod resource;
pub mod users;

pub use auth::AuthStore;
pub use products::ProductsStore;
pub use resource::ResourceStore;
pub use users::UsersStore;
