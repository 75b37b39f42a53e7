//! Record payload mappings (store item shapes).
//!
//! Every record written to the table is one of these serde structs,
//! tagged with a `record_type` discriminant. Index records carry a
//! full projection of their entity so listings are served from the
//! index alone.

pub mod club;
pub mod membership;
pub mod profile;

pub use club::{ClubRecord, RECORD_TYPE_CLUB, RECORD_TYPE_CLUB_NAME_INDEX};
pub use membership::{
    MembershipRecord, RECORD_TYPE_CLUB_MEMBER_INDEX, RECORD_TYPE_MEMBERSHIP,
    RECORD_TYPE_USER_MEMBERSHIP_INDEX,
};
pub use profile::{UserProfileRecord, RECORD_TYPE_USER_PROFILE};
