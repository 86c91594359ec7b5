//! Identity Service Module
//!
//! User accounts, password authentication and JWT sessions, teams (the
//! tenancy boundary of BrainForge), team membership and invitations.

// Public exports
pub mod contract;
pub use contract::{
    client::IdentityApi, error::IdentityError, AuthSession, Invitation, InvitationStatus,
    MemberProfile, Team, TeamMember, TeamMembership, TeamRole, User,
};

pub mod module;
pub use module::IdentityModule;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
