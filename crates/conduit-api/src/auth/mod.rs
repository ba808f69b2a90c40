//! Authentication: JWT issuing/verification, password hashing and the
//! request extractors that resolve the calling user.

pub mod extract;
pub mod password;
pub mod token;

pub use extract::{AuthUser, MaybeAuthUser};
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService};
