pub mod claims;
pub mod codec;
pub mod config;
pub mod error;
pub mod extractors;
pub mod roles;

pub use claims::{Credential, TokenSubject};
pub use codec::TokenCodec;
pub use config::TokenConfig;
pub use error::{AuthError, AuthResult};
pub use extractors::{parse_bearer, AuthContext};
pub use roles::{Role, ROLE_ADMIN, ROLE_MANAGER, ROLE_STAFF};
