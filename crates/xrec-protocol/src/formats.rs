//! Built-in catalog of record formats.
//!
//! Transactions and ledger entries are identified by a 16-bit type code
//! stored in `TransactionType` or `LedgerEntryType`. Inner objects (memos,
//! signer entries and so on) are identified by the field they are stored
//! under.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use xrec_types::FieldId;

use crate::fields::{self, TypedField};
use crate::record::Record;
use crate::template::{SoeStyle, Template};
use crate::template::SoeStyle::{Default as D, Optional as O, Required as R};
use crate::value::{FieldType, Value};

/// Which family a format belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormatKind {
    Transaction,
    LedgerEntry,
}

/// A named template for one transaction or ledger entry type.
#[derive(Clone, Debug)]
pub struct Format {
    name: &'static str,
    kind: FormatKind,
    type_code: u16,
    template: Arc<Template>,
}

impl Format {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> FormatKind {
        self.kind
    }

    pub fn type_code(&self) -> u16 {
        self.type_code
    }

    pub fn template(&self) -> &Arc<Template> {
        &self.template
    }

    /// A new record of this format with its type field filled in.
    pub fn new_record(&self) -> Record {
        let mut record = Record::from_template(self.template.clone(), FieldId::GENERIC);
        let type_field = match self.kind {
            FormatKind::Transaction => fields::TRANSACTION_TYPE.id(),
            FormatKind::LedgerEntry => fields::LEDGER_ENTRY_TYPE.id(),
        };
        if let Some(i) = record.field_index(&type_field) {
            record.slots[i].value = Value::UInt16(self.type_code);
        }
        record
    }
}

/// Transaction type codes.
pub mod tx_type {
    pub const PAYMENT: u16 = 0;
    pub const ACCOUNT_SET: u16 = 3;
    pub const SIGNER_LIST_SET: u16 = 12;
    pub const CHECK_CREATE: u16 = 16;
    pub const CHECK_CASH: u16 = 17;
    pub const CHECK_CANCEL: u16 = 18;
}

/// Ledger entry type codes.
pub mod ledger_type {
    pub const CHECK: u16 = 0x0043;
    pub const ACCOUNT_ROOT: u16 = 0x0061;
    pub const DIRECTORY_NODE: u16 = 0x0064;
}

fn entry<T: FieldType>(field: TypedField<T>, style: SoeStyle) -> (FieldId, SoeStyle) {
    (field.id(), style)
}

/// The set of formats known to this build.
pub struct FormatCatalog {
    transactions: Vec<Format>,
    ledger_entries: Vec<Format>,
    inner: HashMap<FieldId, Arc<Template>>,
}

impl FormatCatalog {
    fn build() -> Self {
        let tx_common = [
            entry(fields::TRANSACTION_TYPE, R),
            entry(fields::FLAGS, O),
            entry(fields::SOURCE_TAG, O),
            entry(fields::ACCOUNT, R),
            entry(fields::SEQUENCE, R),
            entry(fields::PREVIOUS_TXN_ID, O),
            entry(fields::LAST_LEDGER_SEQUENCE, O),
            entry(fields::ACCOUNT_TXN_ID, O),
            entry(fields::FEE, R),
            entry(fields::MEMOS, O),
            entry(fields::SIGNING_PUB_KEY, R),
            entry(fields::TXN_SIGNATURE, O),
            entry(fields::SIGNERS, O),
        ];
        let ledger_common = [
            entry(fields::LEDGER_INDEX, O),
            entry(fields::LEDGER_ENTRY_TYPE, R),
            entry(fields::FLAGS, R),
        ];

        let tx = |name, code, unique: &[(FieldId, SoeStyle)]| Format {
            name,
            kind: FormatKind::Transaction,
            type_code: code,
            template: Arc::new(Template::with_common(unique, &tx_common)),
        };
        let ledger = |name, code, unique: &[(FieldId, SoeStyle)]| Format {
            name,
            kind: FormatKind::LedgerEntry,
            type_code: code,
            template: Arc::new(Template::with_common(unique, &ledger_common)),
        };

        let transactions = vec![
            tx(
                "Payment",
                tx_type::PAYMENT,
                &[
                    entry(fields::DESTINATION, R),
                    entry(fields::AMOUNT, R),
                    entry(fields::SEND_MAX, O),
                    entry(fields::PATHS, D),
                    entry(fields::INVOICE_ID, O),
                    entry(fields::DESTINATION_TAG, O),
                    entry(fields::DELIVER_MIN, O),
                ],
            ),
            tx(
                "AccountSet",
                tx_type::ACCOUNT_SET,
                &[
                    entry(fields::EMAIL_HASH, O),
                    entry(fields::WALLET_LOCATOR, O),
                    entry(fields::WALLET_SIZE, O),
                    entry(fields::MESSAGE_KEY, O),
                    entry(fields::DOMAIN, O),
                    entry(fields::TRANSFER_RATE, O),
                    entry(fields::SET_FLAG, O),
                    entry(fields::CLEAR_FLAG, O),
                    entry(fields::TICK_SIZE, O),
                ],
            ),
            tx(
                "SignerListSet",
                tx_type::SIGNER_LIST_SET,
                &[entry(fields::SIGNER_QUORUM, R), entry(fields::SIGNER_ENTRIES, O)],
            ),
            tx(
                "CheckCreate",
                tx_type::CHECK_CREATE,
                &[
                    entry(fields::DESTINATION, R),
                    entry(fields::SEND_MAX, R),
                    entry(fields::EXPIRATION, O),
                    entry(fields::DESTINATION_TAG, O),
                    entry(fields::INVOICE_ID, O),
                ],
            ),
            tx(
                "CheckCash",
                tx_type::CHECK_CASH,
                &[
                    entry(fields::CHECK_ID, R),
                    entry(fields::AMOUNT, O),
                    entry(fields::DELIVER_MIN, O),
                ],
            ),
            tx("CheckCancel", tx_type::CHECK_CANCEL, &[entry(fields::CHECK_ID, R)]),
        ];

        let ledger_entries = vec![
            ledger(
                "AccountRoot",
                ledger_type::ACCOUNT_ROOT,
                &[
                    entry(fields::ACCOUNT, R),
                    entry(fields::SEQUENCE, R),
                    entry(fields::BALANCE, R),
                    entry(fields::OWNER_COUNT, R),
                    entry(fields::PREVIOUS_TXN_ID, R),
                    entry(fields::PREVIOUS_TXN_LGR_SEQ, R),
                    entry(fields::ACCOUNT_TXN_ID, O),
                    entry(fields::REGULAR_KEY, O),
                    entry(fields::EMAIL_HASH, O),
                    entry(fields::WALLET_LOCATOR, O),
                    entry(fields::WALLET_SIZE, O),
                    entry(fields::MESSAGE_KEY, O),
                    entry(fields::TRANSFER_RATE, O),
                    entry(fields::DOMAIN, O),
                    entry(fields::TICK_SIZE, O),
                ],
            ),
            ledger(
                "DirectoryNode",
                ledger_type::DIRECTORY_NODE,
                &[
                    entry(fields::OWNER, O),
                    entry(fields::TAKER_PAYS_CURRENCY, O),
                    entry(fields::TAKER_PAYS_ISSUER, O),
                    entry(fields::TAKER_GETS_CURRENCY, O),
                    entry(fields::TAKER_GETS_ISSUER, O),
                    entry(fields::EXCHANGE_RATE, O),
                    entry(fields::INDEXES, R),
                    entry(fields::ROOT_INDEX, R),
                    entry(fields::INDEX_NEXT, D),
                    entry(fields::INDEX_PREVIOUS, D),
                ],
            ),
            ledger(
                "Check",
                ledger_type::CHECK,
                &[
                    entry(fields::ACCOUNT, R),
                    entry(fields::DESTINATION, R),
                    entry(fields::SEND_MAX, R),
                    entry(fields::SEQUENCE, R),
                    entry(fields::OWNER_NODE, R),
                    entry(fields::DESTINATION_NODE, R),
                    entry(fields::PREVIOUS_TXN_ID, R),
                    entry(fields::PREVIOUS_TXN_LGR_SEQ, R),
                    entry(fields::EXPIRATION, O),
                    entry(fields::INVOICE_ID, O),
                    entry(fields::SOURCE_TAG, O),
                    entry(fields::DESTINATION_TAG, O),
                ],
            ),
        ];

        let inner: HashMap<FieldId, Arc<Template>> = [
            (
                fields::MEMO.id(),
                vec![
                    entry(fields::MEMO_TYPE, O),
                    entry(fields::MEMO_DATA, O),
                    entry(fields::MEMO_FORMAT, O),
                ],
            ),
            (
                fields::SIGNER_ENTRY.id(),
                vec![entry(fields::ACCOUNT, R), entry(fields::SIGNER_WEIGHT, R)],
            ),
            (
                fields::SIGNER.id(),
                vec![
                    entry(fields::ACCOUNT, R),
                    entry(fields::SIGNING_PUB_KEY, R),
                    entry(fields::TXN_SIGNATURE, R),
                ],
            ),
            (
                fields::MAJORITY.id(),
                vec![entry(fields::AMENDMENT, R), entry(fields::CLOSE_TIME, R)],
            ),
        ]
        .into_iter()
        .map(|(field, entries)| (field, Arc::new(Template::new(entries))))
        .collect();

        Self {
            transactions,
            ledger_entries,
            inner,
        }
    }

    pub fn transactions(&self) -> &[Format] {
        &self.transactions
    }

    pub fn ledger_entries(&self) -> &[Format] {
        &self.ledger_entries
    }

    /// Inner object templates keyed by the field they are stored under.
    pub fn inner_objects(&self) -> impl Iterator<Item = (&FieldId, &Arc<Template>)> {
        self.inner.iter()
    }

    pub fn transaction_by_name(&self, name: &str) -> Option<&Format> {
        self.transactions.iter().find(|f| f.name == name)
    }

    pub fn transaction_by_type(&self, code: u16) -> Option<&Format> {
        self.transactions.iter().find(|f| f.type_code == code)
    }

    pub fn ledger_by_name(&self, name: &str) -> Option<&Format> {
        self.ledger_entries.iter().find(|f| f.name == name)
    }

    pub fn ledger_by_type(&self, code: u16) -> Option<&Format> {
        self.ledger_entries.iter().find(|f| f.type_code == code)
    }

    /// Any format by name, transactions first.
    pub fn by_name(&self, name: &str) -> Option<&Format> {
        self.transaction_by_name(name)
            .or_else(|| self.ledger_by_name(name))
    }

    pub fn inner_object(&self, field: &FieldId) -> Option<&Arc<Template>> {
        self.inner.get(field)
    }

    /// Format named by a record's `TransactionType` or `LedgerEntryType`.
    pub fn format_for(&self, record: &Record) -> Option<&Format> {
        if let Some(code) = record.get_optional(&fields::TRANSACTION_TYPE) {
            return self.transaction_by_type(code);
        }
        record
            .get_optional(&fields::LEDGER_ENTRY_TYPE)
            .and_then(|code| self.ledger_by_type(code))
    }
}

static CATALOG: Lazy<FormatCatalog> = Lazy::new(FormatCatalog::build);

/// The process-wide format catalog.
pub fn catalog() -> &'static FormatCatalog {
    &CATALOG
}

/// Inner template for objects stored under `field`.
pub fn inner_object(field: &FieldId) -> Option<&'static Arc<Template>> {
    CATALOG.inner_object(field)
}
