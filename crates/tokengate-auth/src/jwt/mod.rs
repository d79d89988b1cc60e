//! Token payload, signing, and verification.

pub mod claims;
pub mod codec;
pub mod decoder;
pub mod encoder;

pub use claims::{Claims, TokenKind, TokenPayload};
pub use codec::TokenCodec;
pub use decoder::JwtDecoder;
pub use encoder::{JwtEncoder, SignedToken};
