//! Contract layer - public API for inter-module communication
//!
//! Transport-agnostic models and the native client trait.

pub mod client;
pub mod error;
pub mod model;

pub use client::IdentityApi;
pub use error::IdentityError;
pub use model::{
    AuthSession, Invitation, InvitationStatus, MemberProfile, NewTeam, ProfilePatch, Team,
    TeamMember, TeamMembership, TeamPatch, TeamRole, User,
};
