//! Keypair files in the Solana CLI layout.
//!
//! The file is a JSON array of 64 integers: the 32-byte secret seed followed by
//! the 32-byte public key. The public half is checked against the seed on load.

use std::fs;
use std::io::Write;
use std::path::Path;

use solsend_types::{KeyPair, PrivateKey};

use crate::error::KeypairError;
use crate::keys::keypair_from_private;

/// Length of a serialized keypair (secret ‖ public).
pub const KEYPAIR_BYTES: usize = 64;

/// Rebuild a key pair from its 64-byte form, rejecting a mismatched public half.
pub fn keypair_from_bytes(bytes: &[u8]) -> Result<KeyPair, KeypairError> {
    if bytes.len() != KEYPAIR_BYTES {
        return Err(KeypairError::WrongLength {
            expected: KEYPAIR_BYTES,
            actual: bytes.len(),
        });
    }
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&bytes[..32]);
    let keypair = keypair_from_private(PrivateKey(seed));
    if keypair.public.as_bytes()[..] != bytes[32..] {
        return Err(KeypairError::PublicKeyMismatch);
    }
    Ok(keypair)
}

/// Serialize a key pair to its 64-byte form.
pub fn keypair_to_bytes(keypair: &KeyPair) -> [u8; KEYPAIR_BYTES] {
    let mut out = [0u8; KEYPAIR_BYTES];
    out[..32].copy_from_slice(&keypair.private.0);
    out[32..].copy_from_slice(keypair.public.as_bytes());
    out
}

/// Read a keypair file from disk.
pub fn read_keypair_file(path: &Path) -> Result<KeyPair, KeypairError> {
    let contents = fs::read_to_string(path)?;
    let bytes: Vec<u8> = serde_json::from_str(&contents)
        .map_err(|e| KeypairError::Format(format!("{}: {e}", path.display())))?;
    keypair_from_bytes(&bytes)
}

/// Write a keypair file, refusing to clobber an existing file unless `overwrite`.
pub fn write_keypair_file(
    keypair: &KeyPair,
    path: &Path,
    overwrite: bool,
) -> Result<(), KeypairError> {
    if path.exists() && !overwrite {
        return Err(KeypairError::AlreadyExists(path.display().to_string()));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string(&keypair_to_bytes(keypair).to_vec())
        .map_err(|e| KeypairError::Format(e.to_string()))?;

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}
