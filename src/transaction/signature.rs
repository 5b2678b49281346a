use secp256k1::{Message, Secp256k1, ecdsa};

use crate::codec::decode_fixed;
use crate::error::CodecError;

/// Uncompressed secp256k1 public key as its two affine coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    pub x: [u8; 32],
    pub y: [u8; 32],
}

/// ECDSA signature as the (R, S) integer pair, big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub r: [u8; 32],
    pub s: [u8; 32],
}

/// What the wallet hands over alongside a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credentials {
    pub public_key: PublicKey,
    pub signature: Signature,
}

fn split_halves(s: &str) -> Result<([u8; 32], [u8; 32]), CodecError> {
    let bytes = decode_fixed::<64>(s)?;
    let mut left = [0u8; 32];
    let mut right = [0u8; 32];
    left.copy_from_slice(&bytes[..32]);
    right.copy_from_slice(&bytes[32..]);
    Ok((left, right))
}

impl PublicKey {
    /// Parse the 128-hex-character `X || Y` form.
    pub fn from_hex(s: &str) -> Result<Self, CodecError> {
        let (x, y) = split_halves(s)?;
        Ok(Self { x, y })
    }

    pub fn to_hex(&self) -> String {
        format!("{}{}", hex::encode(self.x), hex::encode(self.y))
    }

    pub fn from_secp(pk: &secp256k1::PublicKey) -> Self {
        let raw = pk.serialize_uncompressed();
        let mut x = [0u8; 32];
        let mut y = [0u8; 32];
        x.copy_from_slice(&raw[1..33]);
        y.copy_from_slice(&raw[33..]);
        Self { x, y }
    }

    fn to_secp(self) -> Option<secp256k1::PublicKey> {
        let mut raw = [0u8; 65];
        raw[0] = 0x04;
        raw[1..33].copy_from_slice(&self.x);
        raw[33..].copy_from_slice(&self.y);
        secp256k1::PublicKey::from_slice(&raw).ok()
    }
}

impl Signature {
    /// Parse the 128-hex-character `R || S` form.
    pub fn from_hex(s: &str) -> Result<Self, CodecError> {
        let (r, s) = split_halves(s)?;
        Ok(Self { r, s })
    }

    pub fn to_hex(&self) -> String {
        format!("{}{}", hex::encode(self.r), hex::encode(self.s))
    }

    pub fn from_secp(sig: &ecdsa::Signature) -> Self {
        let raw = sig.serialize_compact();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&raw[..32]);
        s.copy_from_slice(&raw[32..]);
        Self { r, s }
    }
}

/// Verify `signature` over a 32-byte digest. Off-curve keys and out-of-range
/// scalars simply fail verification. High-S signatures are accepted.
pub fn verify(public_key: &PublicKey, signature: &Signature, digest: [u8; 32]) -> bool {
    let Some(pk) = public_key.to_secp() else {
        return false;
    };
    let mut compact = [0u8; 64];
    compact[..32].copy_from_slice(&signature.r);
    compact[32..].copy_from_slice(&signature.s);
    let Ok(mut sig) = ecdsa::Signature::from_compact(&compact) else {
        return false;
    };
    sig.normalize_s();
    let msg = Message::from_digest(digest);
    Secp256k1::verification_only()
        .verify_ecdsa(&msg, &sig, &pk)
        .is_ok()
}
