//! Cryptographic primitives for solsend.
//!
//! - **Ed25519** for transaction signing and signature verification
//! - Keypair files in the Solana CLI layout (a JSON array of 64 bytes)

pub mod error;
pub mod keypair_file;
pub mod keys;
pub mod sign;

pub use error::KeypairError;
pub use keypair_file::{
    keypair_from_bytes, keypair_to_bytes, read_keypair_file, write_keypair_file, KEYPAIR_BYTES,
};
pub use keys::{generate_keypair, keypair_from_private, keypair_from_seed, public_from_private};
pub use sign::{sign_message, verify_signature};
