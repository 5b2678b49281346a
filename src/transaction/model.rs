use serde::{Deserialize, Serialize};

use super::signature::{Credentials, PublicKey, Signature};
use crate::codec;
use crate::error::AdmissionError;

/// A value transfer between two opaque addresses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender_address: String,
    pub recipient_address: String,
    pub value: f64,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, value: f64) -> Self {
        Self {
            sender_address: sender.into(),
            recipient_address: recipient.into(),
            value,
        }
    }

    /// SHA-256 of the canonical encoding; this is what the sender signs.
    pub fn digest(&self) -> [u8; 32] {
        codec::sha256(&codec::encode_transaction(self))
    }
}

/// Body of `POST /transactions` and of the peer relay `PUT /transactions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub sender_public_key: Option<String>,
    pub sender_address: Option<String>,
    pub recipient_address: Option<String>,
    pub value: Option<f64>,
    pub signature: Option<String>,
}

impl TransactionRequest {
    pub fn from_signed(transaction: &Transaction, credentials: &Credentials) -> Self {
        Self {
            sender_public_key: Some(credentials.public_key.to_hex()),
            sender_address: Some(transaction.sender_address.clone()),
            recipient_address: Some(transaction.recipient_address.clone()),
            value: Some(transaction.value),
            signature: Some(credentials.signature.to_hex()),
        }
    }

    /// Check that every field is present and well formed.
    pub fn validate(&self) -> Result<(Transaction, Credentials), AdmissionError> {
        let (Some(public_key), Some(sender), Some(recipient), Some(value), Some(signature)) = (
            self.sender_public_key.as_deref(),
            self.sender_address.as_deref(),
            self.recipient_address.as_deref(),
            self.value,
            self.signature.as_deref(),
        ) else {
            return Err(AdmissionError::Malformed("missing fields".into()));
        };
        if sender.is_empty() || recipient.is_empty() {
            return Err(AdmissionError::Malformed("empty address".into()));
        }

        let public_key = PublicKey::from_hex(public_key)
            .map_err(|e| AdmissionError::Malformed(format!("sender_public_key: {e}")))?;
        let signature = Signature::from_hex(signature)
            .map_err(|e| AdmissionError::Malformed(format!("signature: {e}")))?;

        Ok((
            Transaction::new(sender, recipient, value),
            Credentials {
                public_key,
                signature,
            },
        ))
    }
}
