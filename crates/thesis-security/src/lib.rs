//! # Thesis Security
//! 
//! Access-token handling: JWT claims to the authentication context
//! consumed by the group session.

pub mod jwt;

pub use jwt::{Claims, JwtError, JwtService};
