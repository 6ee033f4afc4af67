//! Single-signing of records.
//!
//! The signature covers `prefix ‖ signing_bytes()`, so the signature field
//! itself (a non-signing field) never takes part in what it signs.

use tracing::debug;
use xrec_crypto::{HashPrefix, Signature, SignatureError, SigningKey, VerifyingKey};

use crate::error::{RecordError, RecordResult};
use crate::fields;
use crate::record::Record;

fn signing_message(record: &Record, prefix: HashPrefix) -> RecordResult<Vec<u8>> {
    let mut message = prefix.to_bytes().to_vec();
    message.extend_from_slice(&record.signing_bytes()?);
    Ok(message)
}

/// Store the public key of `key` in `SigningPubKey`, then sign the record
/// and store the signature in `TxnSignature`.
pub fn sign_record(record: &mut Record, key: &SigningKey, prefix: HashPrefix) -> RecordResult<()> {
    let public = key.verifying_key();
    record.set(&fields::SIGNING_PUB_KEY, public.to_bytes().to_vec())?;
    let signature = key.sign(&signing_message(record, prefix)?);
    record.set(&fields::TXN_SIGNATURE, signature.to_bytes().to_vec())?;
    debug!(account = %public.account_id(), "record signed");
    Ok(())
}

/// Check `TxnSignature` against `SigningPubKey`. Returns the signer's key.
pub fn verify_record(record: &Record, prefix: HashPrefix) -> RecordResult<VerifyingKey> {
    let public = record.get_ref(&fields::SIGNING_PUB_KEY)?;
    let public = VerifyingKey::from_slice(&public)?;
    let signature = record
        .get_ref(&fields::TXN_SIGNATURE)
        .map_err(|_| RecordError::Signature(SignatureError::InvalidSignature))?;
    let signature = Signature::from_slice(&signature)?;
    public.verify(&signing_message(record, prefix)?, &signature)?;
    Ok(public)
}
