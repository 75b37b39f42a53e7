//! Domain models for the Clubhouse backend.

pub mod capability;
pub mod club;
pub mod membership;
pub mod principal;
pub mod profile;

pub use capability::{club_role_capabilities, system_role_capabilities, Capability};
pub use club::{
    normalize_club_name, Club, ClubPage, ClubPatch, ClubStatus, CreateClubRequest, ListClubsQuery,
    UpdateClubRequest,
};
pub use membership::{
    CreateMembershipRequest, ListClubMembersQuery, Membership, MembershipRole, MembershipStatus,
    MembershipStatusChange, UpdateMemberRequest,
};
pub use principal::{Principal, SystemRole};
pub use profile::{ClubMember, MemberPage, ProfileLookupError, UserDirectory, UserProfile};
