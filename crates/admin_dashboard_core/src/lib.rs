pub mod auth;
pub mod domain;
pub mod guard;
pub mod pagination;
pub mod ports;
pub mod resource;
pub mod validation;

pub use auth::{AuthAction, AuthPhase, AuthState};
pub use domain::{
    AuthUser, Credentials, Product, ProductCategory, ProductDraft, Registration, Role, Session,
    User, UserStatus,
};
pub use guard::{guard, GuardDecision};
pub use pagination::{paginate, Page};
pub use ports::{AdminApi, PortError, PortResult};
pub use resource::{Applied, Entity, RequestKind, RequestSeq, ResourceAction, ResourceState};
pub use validation::FieldErrors;
