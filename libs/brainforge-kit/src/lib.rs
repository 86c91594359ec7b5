//! BrainForge Kit
//!
//! Shared plumbing used by every BrainForge module: RFC-9457 problem
//! responses, the authenticated security context, JWT issuance and the
//! bearer-token middleware, pagination helpers, database bootstrap and
//! the small module traits the server uses to wire everything together.

pub mod auth;
pub mod db;
pub mod module;
pub mod paging;
pub mod problem;
pub mod security;

pub use auth::{require_auth, AuthError, Claims, IssuedToken, TokenService};
pub use module::{DbModule, RestModule};
pub use paging::{Page, PageQuery};
pub use problem::Problem;
pub use security::{Role, SecurityCtx};
