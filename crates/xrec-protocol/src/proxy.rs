//! Mutable typed views of a single field.
//!
//! [`ValueProxy`] reads and writes a field that is expected to hold a value.
//! [`OptionalProxy`] additionally models absence, so an optional field can
//! be assigned, cleared and compared like an `Option`.

use crate::error::{RecordError, RecordResult};
use crate::fields::TypedField;
use crate::record::Record;
use crate::template::SoeStyle;
use crate::value::FieldType;

/// Bound records only hand out views of fields their template declares.
fn bind_style<T>(record: &Record, field: &TypedField<T>) -> RecordResult<SoeStyle> {
    record.style_of(field)
}

fn read<T: FieldType>(record: &Record, field: &TypedField<T>, style: SoeStyle) -> RecordResult<T> {
    match record.peek_field(field) {
        Some(value) if value.is_present() => {
            T::from_value(value)
                .cloned()
                .ok_or(RecordError::WrongFieldType {
                    field: field.name(),
                    expected: T::KIND,
                    actual: value.kind(),
                })
        }
        _ if style == SoeStyle::Default => Ok(T::default()),
        _ => Err(RecordError::FieldMissing { field: field.name() }),
    }
}

/// Typed read/write access to one field of a record.
pub struct ValueProxy<'a, T> {
    record: &'a mut Record,
    field: TypedField<T>,
    style: SoeStyle,
}

impl<'a, T: FieldType> ValueProxy<'a, T> {
    pub(crate) fn new(record: &'a mut Record, field: TypedField<T>) -> RecordResult<Self> {
        let style = bind_style(record, &field)?;
        Ok(Self {
            record,
            field,
            style,
        })
    }

    pub fn style(&self) -> SoeStyle {
        self.style
    }

    /// Current value; an absent `Default` field reads as its default.
    pub fn get(&self) -> RecordResult<T> {
        read(&*self.record, &self.field, self.style)
    }

    pub fn set(&mut self, value: T) -> RecordResult<()> {
        self.record.set(&self.field, value)
    }
}

/// Typed access to one field, with absence modelled as `None`.
///
/// A `Default` field is always engaged: when absent it reads as its
/// default value.
pub struct OptionalProxy<'a, T> {
    record: &'a mut Record,
    field: TypedField<T>,
    style: SoeStyle,
}

impl<'a, T: FieldType> OptionalProxy<'a, T> {
    pub(crate) fn new(record: &'a mut Record, field: TypedField<T>) -> RecordResult<Self> {
        let style = bind_style(record, &field)?;
        Ok(Self {
            record,
            field,
            style,
        })
    }

    pub fn style(&self) -> SoeStyle {
        self.style
    }

    pub fn is_engaged(&self) -> bool {
        self.style == SoeStyle::Default || self.record.is_field_present(&self.field)
    }

    /// Current value, or [`RecordError::FieldMissing`] when disengaged.
    pub fn get(&self) -> RecordResult<T> {
        read(&*self.record, &self.field, self.style)
    }

    /// Current value as an `Option`.
    pub fn value(&self) -> Option<T> {
        if self.is_engaged() {
            read(&*self.record, &self.field, self.style).ok()
        } else {
            None
        }
    }

    pub fn value_or(&self, fallback: T) -> T {
        self.value().unwrap_or(fallback)
    }

    pub fn set(&mut self, value: T) -> RecordResult<()> {
        self.record.set(&self.field, value)
    }

    /// `Some` stores the value, `None` disengages the field.
    pub fn assign(&mut self, value: Option<T>) -> RecordResult<()> {
        match value {
            Some(v) => self.set(v),
            None => self.clear(),
        }
    }

    /// Disengage the field. Required and `Default` fields refuse; a free
    /// record drops the slot entirely.
    pub fn clear(&mut self) -> RecordResult<()> {
        self.record.clear(&self.field)
    }
}

impl<T: FieldType> PartialEq<Option<T>> for OptionalProxy<'_, T> {
    fn eq(&self, other: &Option<T>) -> bool {
        self.value() == *other
    }
}

impl<'b, T: FieldType> PartialEq<OptionalProxy<'b, T>> for OptionalProxy<'_, T> {
    fn eq(&self, other: &OptionalProxy<'b, T>) -> bool {
        self.value() == other.value()
    }
}

impl Record {
    /// Typed view of `field`. Bound records only hand out views of
    /// declared fields.
    pub fn value_proxy<T: FieldType>(
        &mut self,
        field: TypedField<T>,
    ) -> RecordResult<ValueProxy<'_, T>> {
        ValueProxy::new(self, field)
    }

    /// Optional typed view of `field`.
    pub fn optional_proxy<T: FieldType>(
        &mut self,
        field: TypedField<T>,
    ) -> RecordResult<OptionalProxy<'_, T>> {
        OptionalProxy::new(self, field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;
    use crate::template::Template;
    use std::sync::Arc;
    use xrec_types::{FieldId, Hash256};

    fn template() -> Arc<Template> {
        Arc::new(Template::new([
            (fields::SEQUENCE.id(), SoeStyle::Required),
            (fields::EXPIRATION.id(), SoeStyle::Optional),
            (fields::OWNER_NODE.id(), SoeStyle::Default),
            (fields::INVOICE_ID.id(), SoeStyle::Optional),
        ]))
    }

    #[test]
    fn value_proxy_reads_and_writes() {
        let mut r = Record::from_template(template(), FieldId::GENERIC);
        let mut seq = r.value_proxy(fields::SEQUENCE).unwrap();
        assert_eq!(seq.style(), SoeStyle::Required);
        assert_eq!(seq.get().unwrap(), 0);
        seq.set(12).unwrap();
        assert_eq!(seq.get().unwrap(), 12);
        assert_eq!(r.get(&fields::SEQUENCE).unwrap(), 12);
    }

    #[test]
    fn proxy_for_undeclared_field_fails() {
        let mut r = Record::from_template(template(), FieldId::GENERIC);
        assert!(matches!(
            r.value_proxy(fields::FEE),
            Err(RecordError::FieldNotDeclared { field: "Fee" })
        ));
        assert!(r.optional_proxy(fields::FEE).is_err());
    }

    #[test]
    fn declared_field_without_slot_still_binds() {
        let mut r = Record::from_template(template(), FieldId::GENERIC);
        assert!(r.del_field(&fields::EXPIRATION));
        assert_eq!(r.style_of(&fields::EXPIRATION), Ok(SoeStyle::Optional));

        let mut exp = r.optional_proxy(fields::EXPIRATION).unwrap();
        assert!(!exp.is_engaged());
        assert!(exp == None);
        exp.set(9).unwrap();
        assert!(exp == Some(9));
        assert_eq!(r.field_index(&fields::EXPIRATION), Some(1));
    }

    #[test]
    fn optional_engagement() {
        let mut r = Record::from_template(template(), FieldId::GENERIC);
        let mut exp = r.optional_proxy(fields::EXPIRATION).unwrap();
        assert!(!exp.is_engaged());
        assert_eq!(exp.value(), None);
        assert_eq!(exp.get(), Err(RecordError::FieldMissing { field: "Expiration" }));
        assert_eq!(exp.value_or(7), 7);

        exp.set(100).unwrap();
        assert!(exp.is_engaged());
        assert!(exp == Some(100));

        exp.assign(None).unwrap();
        assert!(!exp.is_engaged());
        assert!(exp == None);
        assert_eq!(r.len(), 4);
    }

    #[test]
    fn default_field_is_always_engaged() {
        let mut r = Record::from_template(template(), FieldId::GENERIC);
        let mut node = r.optional_proxy(fields::OWNER_NODE).unwrap();
        assert!(node.is_engaged());
        assert_eq!(node.value(), Some(0));
        node.set(4).unwrap();
        assert!(node == Some(4));
        node.set(0).unwrap();
        assert!(node == Some(0));
        assert!(!r.is_field_present(&fields::OWNER_NODE));
    }

    #[test]
    fn cannot_disengage_required_or_default() {
        let mut r = Record::from_template(template(), FieldId::GENERIC);
        let mut seq = r.optional_proxy(fields::SEQUENCE).unwrap();
        assert!(matches!(
            seq.clear(),
            Err(RecordError::TemplateViolation { field: "Sequence", .. })
        ));
        let mut node = r.optional_proxy(fields::OWNER_NODE).unwrap();
        assert!(matches!(
            node.assign(None),
            Err(RecordError::TemplateViolation { field: "OwnerNode", .. })
        ));
    }

    #[test]
    fn free_record_disengage_drops_slot() {
        let mut r = Record::new(FieldId::GENERIC);
        let mut inv = r.optional_proxy(fields::INVOICE_ID).unwrap();
        assert!(!inv.is_engaged());
        inv.set(Hash256::from_array([1; 32])).unwrap();
        assert!(inv.is_engaged());
        inv.clear().unwrap();
        assert!(inv == None);
        assert!(r.is_empty());
    }

    #[test]
    fn proxies_compare_by_value() {
        let mut a = Record::from_template(template(), FieldId::GENERIC);
        let mut b = Record::new(FieldId::GENERIC);
        a.set(&fields::EXPIRATION, 5).unwrap();
        b.set(&fields::EXPIRATION, 5).unwrap();
        let pa = a.optional_proxy(fields::EXPIRATION).unwrap();
        let pb = b.optional_proxy(fields::EXPIRATION).unwrap();
        assert!(pa == pb);
    }
}
