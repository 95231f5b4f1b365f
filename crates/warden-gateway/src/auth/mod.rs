//! Authentication primitives: bearer-token verification and the public-path
//! exemption list.

mod public_paths;
mod token;

pub use public_paths::PublicPathClassifier;
pub use token::{Claims, MIN_SECRET_BYTES, TokenVerifier};
