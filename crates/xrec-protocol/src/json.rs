//! JSON rendering of records for display and tooling.

use serde_json::{json, Map, Value as Json};
use xrec_types::{Amount, FieldId};

use crate::fields;
use crate::formats::catalog;
use crate::record::Record;
use crate::value::Value;

impl Value {
    /// JSON form of this value as stored under `field`.
    ///
    /// 64-bit integers render as hex strings; type codes render as format
    /// names when the catalog knows them.
    pub fn to_json(&self, field: &FieldId) -> Json {
        match self {
            Value::NotPresent => Json::Null,
            Value::UInt8(v) => json!(v),
            Value::UInt16(v) if *field == fields::TRANSACTION_TYPE.id() => catalog()
                .transaction_by_type(*v)
                .map_or_else(|| json!(v), |f| json!(f.name())),
            Value::UInt16(v) if *field == fields::LEDGER_ENTRY_TYPE.id() => catalog()
                .ledger_by_type(*v)
                .map_or_else(|| json!(v), |f| json!(f.name())),
            Value::UInt16(v) => json!(v),
            Value::UInt32(v) => json!(v),
            Value::UInt64(v) => json!(format!("{v:016X}")),
            Value::Hash128(h) => json!(h.to_hex()),
            Value::Hash160(h) => json!(h.to_hex()),
            Value::Hash256(h) => json!(h.to_hex()),
            Value::Blob(b) => json!(hex::encode_upper(b)),
            Value::Account(a) => json!(a.to_hex()),
            Value::Amount(a) => amount_json(a),
            Value::PathSet(p) => Json::Array(
                p.paths()
                    .iter()
                    .map(|path| {
                        Json::Array(
                            path.iter()
                                .map(|e| {
                                    let mut m = Map::new();
                                    if let Some(a) = e.account() {
                                        m.insert("account".into(), json!(a.to_hex()));
                                    }
                                    if let Some(c) = e.currency() {
                                        m.insert("currency".into(), json!(c.to_string()));
                                    }
                                    if let Some(i) = e.issuer() {
                                        m.insert("issuer".into(), json!(i.to_hex()));
                                    }
                                    Json::Object(m)
                                })
                                .collect(),
                        )
                    })
                    .collect(),
            ),
            Value::Vector256(v) => Json::Array(v.iter().map(|h| json!(h.to_hex())).collect()),
            Value::Object(r) => r.to_json(),
            Value::Array(a) => a.to_json(),
        }
    }
}

fn amount_json(amount: &Amount) -> Json {
    match amount {
        Amount::Native { .. } => json!(amount.value_text()),
        Amount::Issued(_) => json!({
            "value": amount.value_text(),
            "currency": amount.currency().to_string(),
            "issuer": amount.issuer().to_hex(),
        }),
    }
}

impl Record {
    /// JSON object keyed by field name, holding the present fields.
    pub fn to_json(&self) -> Json {
        let map: Map<String, Json> = self
            .present_fields()
            .map(|(field, value)| (field.name().to_string(), value.to_json(field)))
            .collect();
        Json::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::tx_type;
    use xrec_types::{AccountId, Currency};

    #[test]
    fn type_codes_render_as_names() {
        let mut r = Record::new(FieldId::GENERIC);
        r.set(&fields::TRANSACTION_TYPE, tx_type::CHECK_CREATE).unwrap();
        r.set(&fields::SEQUENCE, 3).unwrap();
        let j = r.to_json();
        assert_eq!(j["TransactionType"], "CheckCreate");
        assert_eq!(j["Sequence"], 3);
    }

    #[test]
    fn unknown_type_code_stays_numeric() {
        let mut r = Record::new(FieldId::GENERIC);
        r.set(&fields::TRANSACTION_TYPE, 999).unwrap();
        assert_eq!(r.to_json()["TransactionType"], 999);
    }

    #[test]
    fn amounts() {
        let mut r = Record::new(FieldId::GENERIC);
        r.set(&fields::FEE, Amount::native(12).unwrap()).unwrap();
        let usd = Amount::issued(
            1_000_000_000_000_000,
            -15,
            false,
            Currency::from_code("USD").unwrap(),
            AccountId::from_array([0xAB; 20]),
        )
        .unwrap();
        r.set(&fields::AMOUNT, usd).unwrap();
        let j = r.to_json();
        assert_eq!(j["Fee"], "12");
        assert_eq!(j["Amount"]["currency"], "USD");
        assert_eq!(j["Amount"]["value"], "1");
    }

    #[test]
    fn wide_integers_are_hex() {
        let mut r = Record::new(FieldId::GENERIC);
        r.set(&fields::INDEX_NEXT, 0x1F).unwrap();
        assert_eq!(r.to_json()["IndexNext"], "000000000000001F");
    }

    #[test]
    fn absent_fields_are_omitted() {
        let t = catalog().transaction_by_name("CheckCancel").unwrap();
        let r = t.new_record();
        let j = r.to_json();
        assert!(j.get("TxnSignature").is_none());
        assert!(j.get("Fee").is_some());
    }
}
