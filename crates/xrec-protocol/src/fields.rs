//! Registry of every field known to the protocol.
//!
//! Each field is a [`TypedField`] constant carrying both its wire identity
//! and the Rust type of its payload, so typed record access is checked at
//! compile time. Decoding looks fields up by `(type code, ordinal)`.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;

use once_cell::sync::Lazy;
use xrec_types::{
    AccountId, Amount, FieldId, Hash128, Hash160, Hash256, PathSet, SerializedTypeId, Vector256,
};

use crate::array::RecordArray;
use crate::record::Record;
use crate::value::FieldType;

/// A field identity bound to the Rust type of its payload.
pub struct TypedField<T> {
    id: FieldId,
    _payload: PhantomData<fn() -> T>,
}

impl<T: FieldType> TypedField<T> {
    /// Bind `id` to `T`. Fails const evaluation when the kinds disagree.
    pub const fn new(id: FieldId) -> Self {
        assert!(
            id.kind().code() == T::KIND.code(),
            "field kind does not match its payload type"
        );
        Self {
            id,
            _payload: PhantomData,
        }
    }
}

impl<T> TypedField<T> {
    pub const fn id(&self) -> FieldId {
        self.id
    }
}

impl<T> Clone for TypedField<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedField<T> {}

impl<T> Deref for TypedField<T> {
    type Target = FieldId;

    fn deref(&self) -> &FieldId {
        &self.id
    }
}

impl<T> From<TypedField<T>> for FieldId {
    fn from(f: TypedField<T>) -> Self {
        f.id
    }
}

impl<T> fmt::Debug for TypedField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.id)
    }
}

/// Terminates the field list of a nested object.
pub const OBJECT_END_MARKER: FieldId = FieldId::new(SerializedTypeId::Object, 1, "ObjectEndMarker");

/// Terminates the element list of an array.
pub const ARRAY_END_MARKER: FieldId = FieldId::new(SerializedTypeId::Array, 1, "ArrayEndMarker");

macro_rules! field_id {
    ($kind:ident, $ord:expr, $name:literal) => {
        FieldId::new(SerializedTypeId::$kind, $ord, $name)
    };
    ($kind:ident, $ord:expr, $name:literal, non_signing) => {
        FieldId::non_signing(SerializedTypeId::$kind, $ord, $name)
    };
}

macro_rules! fields {
    ($( $konst:ident: $ty:ty = $kind:ident($ord:expr, $name:literal $(, $flag:ident)?); )*) => {
        $(
            pub const $konst: TypedField<$ty> = TypedField::new(field_id!($kind, $ord, $name $(, $flag)?));
        )*

        /// Every registered field, in declaration order.
        pub static ALL: &[FieldId] = &[$($konst.id()),*];
    };
}

fields! {
    // 8-bit integers
    CLOSE_RESOLUTION: u8 = UInt8(1, "CloseResolution");
    METHOD: u8 = UInt8(2, "Method");
    TRANSACTION_RESULT: u8 = UInt8(3, "TransactionResult");
    TICK_SIZE: u8 = UInt8(16, "TickSize");

    // 16-bit integers
    LEDGER_ENTRY_TYPE: u16 = UInt16(1, "LedgerEntryType");
    TRANSACTION_TYPE: u16 = UInt16(2, "TransactionType");
    SIGNER_WEIGHT: u16 = UInt16(3, "SignerWeight");

    // 32-bit integers
    FLAGS: u32 = UInt32(2, "Flags");
    SOURCE_TAG: u32 = UInt32(3, "SourceTag");
    SEQUENCE: u32 = UInt32(4, "Sequence");
    PREVIOUS_TXN_LGR_SEQ: u32 = UInt32(5, "PreviousTxnLgrSeq");
    LEDGER_SEQUENCE: u32 = UInt32(6, "LedgerSequence");
    CLOSE_TIME: u32 = UInt32(7, "CloseTime");
    PARENT_CLOSE_TIME: u32 = UInt32(8, "ParentCloseTime");
    SIGNING_TIME: u32 = UInt32(9, "SigningTime");
    EXPIRATION: u32 = UInt32(10, "Expiration");
    TRANSFER_RATE: u32 = UInt32(11, "TransferRate");
    WALLET_SIZE: u32 = UInt32(12, "WalletSize");
    OWNER_COUNT: u32 = UInt32(13, "OwnerCount");
    DESTINATION_TAG: u32 = UInt32(14, "DestinationTag");
    OFFER_SEQUENCE: u32 = UInt32(25, "OfferSequence");
    LAST_LEDGER_SEQUENCE: u32 = UInt32(27, "LastLedgerSequence");
    SET_FLAG: u32 = UInt32(33, "SetFlag");
    CLEAR_FLAG: u32 = UInt32(34, "ClearFlag");
    SIGNER_QUORUM: u32 = UInt32(35, "SignerQuorum");

    // 64-bit integers
    INDEX_NEXT: u64 = UInt64(1, "IndexNext");
    INDEX_PREVIOUS: u64 = UInt64(2, "IndexPrevious");
    BOOK_NODE: u64 = UInt64(3, "BookNode");
    OWNER_NODE: u64 = UInt64(4, "OwnerNode");
    EXCHANGE_RATE: u64 = UInt64(6, "ExchangeRate");
    LOW_NODE: u64 = UInt64(7, "LowNode");
    HIGH_NODE: u64 = UInt64(8, "HighNode");
    DESTINATION_NODE: u64 = UInt64(9, "DestinationNode");

    // 128-bit
    EMAIL_HASH: Hash128 = Hash128(1, "EmailHash");

    // 160-bit
    TAKER_PAYS_CURRENCY: Hash160 = Hash160(1, "TakerPaysCurrency");
    TAKER_PAYS_ISSUER: Hash160 = Hash160(2, "TakerPaysIssuer");
    TAKER_GETS_CURRENCY: Hash160 = Hash160(3, "TakerGetsCurrency");
    TAKER_GETS_ISSUER: Hash160 = Hash160(4, "TakerGetsIssuer");

    // 256-bit
    LEDGER_HASH: Hash256 = Hash256(1, "LedgerHash");
    PARENT_HASH: Hash256 = Hash256(2, "ParentHash");
    TRANSACTION_HASH: Hash256 = Hash256(3, "TransactionHash");
    ACCOUNT_HASH: Hash256 = Hash256(4, "AccountHash");
    PREVIOUS_TXN_ID: Hash256 = Hash256(5, "PreviousTxnID");
    LEDGER_INDEX: Hash256 = Hash256(6, "LedgerIndex");
    WALLET_LOCATOR: Hash256 = Hash256(7, "WalletLocator");
    ROOT_INDEX: Hash256 = Hash256(8, "RootIndex");
    ACCOUNT_TXN_ID: Hash256 = Hash256(9, "AccountTxnID");
    BOOK_DIRECTORY: Hash256 = Hash256(16, "BookDirectory");
    INVOICE_ID: Hash256 = Hash256(17, "InvoiceID");
    NICKNAME: Hash256 = Hash256(18, "Nickname");
    AMENDMENT: Hash256 = Hash256(19, "Amendment");
    DIGEST: Hash256 = Hash256(21, "Digest");
    CHECK_ID: Hash256 = Hash256(24, "CheckID");

    // amounts
    AMOUNT: Amount = Amount(1, "Amount");
    BALANCE: Amount = Amount(2, "Balance");
    LIMIT_AMOUNT: Amount = Amount(3, "LimitAmount");
    TAKER_PAYS: Amount = Amount(4, "TakerPays");
    TAKER_GETS: Amount = Amount(5, "TakerGets");
    LOW_LIMIT: Amount = Amount(6, "LowLimit");
    HIGH_LIMIT: Amount = Amount(7, "HighLimit");
    FEE: Amount = Amount(8, "Fee");
    SEND_MAX: Amount = Amount(9, "SendMax");
    DELIVER_MIN: Amount = Amount(10, "DeliverMin");
    DELIVERED_AMOUNT: Amount = Amount(18, "DeliveredAmount");

    // variable length
    PUBLIC_KEY: Vec<u8> = Blob(1, "PublicKey");
    MESSAGE_KEY: Vec<u8> = Blob(2, "MessageKey");
    SIGNING_PUB_KEY: Vec<u8> = Blob(3, "SigningPubKey");
    TXN_SIGNATURE: Vec<u8> = Blob(4, "TxnSignature", non_signing);
    SIGNATURE: Vec<u8> = Blob(6, "Signature", non_signing);
    DOMAIN: Vec<u8> = Blob(7, "Domain");
    MEMO_TYPE: Vec<u8> = Blob(12, "MemoType");
    MEMO_DATA: Vec<u8> = Blob(13, "MemoData");
    MEMO_FORMAT: Vec<u8> = Blob(14, "MemoFormat");

    // accounts
    ACCOUNT: AccountId = AccountId(1, "Account");
    OWNER: AccountId = AccountId(2, "Owner");
    DESTINATION: AccountId = AccountId(3, "Destination");
    ISSUER: AccountId = AccountId(4, "Issuer");
    AUTHORIZE: AccountId = AccountId(5, "Authorize");
    UNAUTHORIZE: AccountId = AccountId(6, "Unauthorize");
    REGULAR_KEY: AccountId = AccountId(8, "RegularKey");

    // inner objects
    TRANSACTION_META_DATA: Record = Object(2, "TransactionMetaData");
    CREATED_NODE: Record = Object(3, "CreatedNode");
    DELETED_NODE: Record = Object(4, "DeletedNode");
    MODIFIED_NODE: Record = Object(5, "ModifiedNode");
    PREVIOUS_FIELDS: Record = Object(6, "PreviousFields");
    FINAL_FIELDS: Record = Object(7, "FinalFields");
    NEW_FIELDS: Record = Object(8, "NewFields");
    TEMPLATE_ENTRY: Record = Object(9, "TemplateEntry");
    MEMO: Record = Object(10, "Memo");
    SIGNER_ENTRY: Record = Object(11, "SignerEntry");
    SIGNER: Record = Object(16, "Signer");
    MAJORITY: Record = Object(18, "Majority");

    // arrays
    SIGNERS: RecordArray = Array(3, "Signers", non_signing);
    SIGNER_ENTRIES: RecordArray = Array(4, "SignerEntries");
    TEMPLATE: RecordArray = Array(5, "Template");
    NECESSARY: RecordArray = Array(6, "Necessary");
    SUFFICIENT: RecordArray = Array(7, "Sufficient");
    AFFECTED_NODES: RecordArray = Array(8, "AffectedNodes");
    MEMOS: RecordArray = Array(9, "Memos");
    MAJORITIES: RecordArray = Array(16, "Majorities");

    // path sets and hash vectors
    PATHS: PathSet = PathSet(1, "Paths");
    INDEXES: Vector256 = Vector256(1, "Indexes");
    HASHES: Vector256 = Vector256(2, "Hashes");
    AMENDMENTS: Vector256 = Vector256(3, "Amendments");
}

static BY_CODE: Lazy<HashMap<u32, FieldId>> =
    Lazy::new(|| ALL.iter().map(|f| (f.code(), *f)).collect());

/// Look up a registered field by its wire type code and ordinal.
pub fn lookup(type_code: u16, ordinal: u8) -> Option<FieldId> {
    BY_CODE
        .get(&((u32::from(type_code) << 16) | u32::from(ordinal)))
        .copied()
}

/// The registered field equal to `field`, carrying the registry's name and
/// signing flag.
pub fn resolve(field: &FieldId) -> Option<FieldId> {
    lookup(field.kind().code(), field.ordinal())
}

/// Look up a registered field by its exact name.
pub fn by_name(name: &str) -> Option<FieldId> {
    ALL.iter().find(|f| f.name() == name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn registry_has_unique_codes_and_names() {
        let codes: HashSet<u32> = ALL.iter().map(|f| f.code()).collect();
        assert_eq!(codes.len(), ALL.len());
        let names: HashSet<&str> = ALL.iter().map(|f| f.name()).collect();
        assert_eq!(names.len(), ALL.len());
    }

    #[test]
    fn end_markers_are_not_registered() {
        assert!(lookup(SerializedTypeId::Object.code(), 1).is_none());
        assert!(lookup(SerializedTypeId::Array.code(), 1).is_none());
        assert!(!ALL.contains(&OBJECT_END_MARKER));
        assert!(!ALL.contains(&ARRAY_END_MARKER));
    }

    #[test]
    fn lookup_by_code_and_name() {
        assert_eq!(lookup(2, 4), Some(SEQUENCE.id()));
        assert_eq!(lookup(8, 1).map(|f| f.name()), Some("Account"));
        assert_eq!(by_name("Fee"), Some(FEE.id()));
        assert_eq!(lookup(2, 200), None);
        assert_eq!(by_name("NoSuchField"), None);
    }

    #[test]
    fn signature_fields_are_non_signing() {
        assert!(!TXN_SIGNATURE.is_signing());
        assert!(!SIGNERS.is_signing());
        assert!(SIGNING_PUB_KEY.is_signing());
        let non_signing = ALL.iter().filter(|f| !f.is_signing()).count();
        assert_eq!(non_signing, 3);
    }

    #[test]
    fn typed_fields_deref_to_ids() {
        let id: &FieldId = &FLAGS;
        assert_eq!(id.kind(), SerializedTypeId::UInt32);
        assert_eq!(FieldId::from(FLAGS), FLAGS.id());
    }
}
