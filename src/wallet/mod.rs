//! Development wallet: the signing side of a transfer. The node itself only
//! ever sees the public key, address and signature a wallet produces.

use rand::rngs::OsRng;
use secp256k1::{Message, Secp256k1, SecretKey};

use crate::transaction::{Credentials, PublicKey, Signature, Transaction};

pub struct Wallet {
    secret: SecretKey,
    public: PublicKey,
    address: String,
}

impl Wallet {
    /// Generate a new secp256k1 keypair.
    pub fn generate() -> Self {
        let secp = Secp256k1::new();
        let (secret, pk) = secp.generate_keypair(&mut OsRng);
        // Address is simply the hex of the compressed public key (didactic).
        let address = hex::encode(pk.serialize());
        Self {
            secret,
            public: PublicKey::from_secp(&pk),
            address,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn public_key(&self) -> PublicKey {
        self.public
    }

    pub fn private_key_hex(&self) -> String {
        hex::encode(self.secret.secret_bytes())
    }

    pub fn sign_digest(&self, digest: [u8; 32]) -> Signature {
        let secp = Secp256k1::signing_only();
        let msg = Message::from_digest(digest);
        Signature::from_secp(&secp.sign_ecdsa(&msg, &self.secret))
    }

    /// Sign the canonical digest of `transaction`.
    pub fn credentials(&self, transaction: &Transaction) -> Credentials {
        Credentials {
            public_key: self.public,
            signature: self.sign_digest(transaction.digest()),
        }
    }
}
