use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use xrec_types::{FieldId, SerializedTypeId};

use crate::error::SchemaError;
use crate::fields;

/// Presence rule of a field within a template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoeStyle {
    /// No template is bound; presence is raw slot existence.
    Invalid,
    /// Must always hold a value.
    Required,
    /// May be absent; absence is observable.
    Optional,
    /// Absence reads as the kind's default value.
    Default,
}

impl SoeStyle {
    pub fn name(self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::Required => "required",
            Self::Optional => "optional",
            Self::Default => "default",
        }
    }
}

/// One declared field of a template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TemplateEntry {
    pub field: FieldId,
    pub style: SoeStyle,
}

/// Ordered schema of the fields legal for one kind of record.
///
/// Templates are immutable once built and are shared between records as
/// `Arc<Template>`.
#[derive(Clone, Debug, Default)]
pub struct Template {
    entries: Vec<TemplateEntry>,
    index: HashMap<FieldId, usize>,
}

impl Template {
    /// Build a template, keeping the first declaration of any repeated field
    /// and skipping entries that cannot appear in a template. Entries are
    /// stored as their registered field.
    pub fn new(entries: impl IntoIterator<Item = (FieldId, SoeStyle)>) -> Self {
        let mut template = Self::default();
        for (field, style) in entries {
            if style == SoeStyle::Invalid || template.index.contains_key(&field) {
                continue;
            }
            if let Some(field) = fields::resolve(&field) {
                template.push(field, style);
            }
        }
        template
    }

    /// Build a template, rejecting repeated fields and unusable entries.
    pub fn try_new(
        entries: impl IntoIterator<Item = (FieldId, SoeStyle)>,
    ) -> Result<Self, SchemaError> {
        let mut template = Self::default();
        for (field, style) in entries {
            if style == SoeStyle::Invalid {
                return Err(SchemaError::InvalidStyle(field.name()));
            }
            if field.kind() == SerializedTypeId::NotPresent {
                return Err(SchemaError::UntypedField(field.name()));
            }
            if template.index.contains_key(&field) {
                return Err(SchemaError::DuplicateField(field.name()));
            }
            let registered =
                fields::resolve(&field).ok_or(SchemaError::UnregisteredField(field.name()))?;
            template.push(registered, style);
        }
        Ok(template)
    }

    /// Kind-specific fields followed by the fields common to a family.
    pub fn with_common(unique: &[(FieldId, SoeStyle)], common: &[(FieldId, SoeStyle)]) -> Self {
        Self::new(unique.iter().chain(common.iter()).copied())
    }

    fn push(&mut self, field: FieldId, style: SoeStyle) {
        self.index.insert(field, self.entries.len());
        self.entries.push(TemplateEntry { field, style });
    }

    pub fn entries(&self) -> &[TemplateEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declared position of `field`.
    pub fn position(&self, field: &FieldId) -> Option<usize> {
        self.index.get(field).copied()
    }

    /// Declared style of `field`, or `None` if it is not part of the template.
    pub fn style(&self, field: &FieldId) -> Option<SoeStyle> {
        self.position(field).map(|i| self.entries[i].style)
    }

    pub fn contains(&self, field: &FieldId) -> bool {
        self.index.contains_key(field)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldId> {
        self.entries
            .iter()
            .filter(|e| e.style == SoeStyle::Required)
            .map(|e| &e.field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_declaration_order() {
        let t = Template::new([
            (fields::DESTINATION.id(), SoeStyle::Required),
            (fields::ACCOUNT.id(), SoeStyle::Required),
            (fields::EXPIRATION.id(), SoeStyle::Optional),
        ]);
        assert_eq!(t.len(), 3);
        assert_eq!(t.position(&fields::DESTINATION), Some(0));
        assert_eq!(t.position(&fields::EXPIRATION), Some(2));
        assert_eq!(t.style(&fields::EXPIRATION), Some(SoeStyle::Optional));
        assert_eq!(t.style(&fields::FEE), None);
    }

    #[test]
    fn new_keeps_first_declaration() {
        let t = Template::new([
            (fields::ACCOUNT.id(), SoeStyle::Required),
            (fields::ACCOUNT.id(), SoeStyle::Optional),
        ]);
        assert_eq!(t.len(), 1);
        assert_eq!(t.style(&fields::ACCOUNT), Some(SoeStyle::Required));
    }

    #[test]
    fn try_new_rejects_duplicates() {
        let err = Template::try_new([
            (fields::ACCOUNT.id(), SoeStyle::Required),
            (fields::ACCOUNT.id(), SoeStyle::Optional),
        ])
        .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateField("Account"));
    }

    #[test]
    fn try_new_rejects_invalid_style() {
        let err = Template::try_new([(fields::FEE.id(), SoeStyle::Invalid)]).unwrap_err();
        assert_eq!(err, SchemaError::InvalidStyle("Fee"));
    }

    #[test]
    fn try_new_rejects_untyped_field() {
        let err = Template::try_new([(FieldId::GENERIC, SoeStyle::Optional)]).unwrap_err();
        assert_eq!(err, SchemaError::UntypedField("Generic"));
    }

    #[test]
    fn entries_take_the_registered_identity() {
        let lookalike = FieldId::new(SerializedTypeId::Blob, 4, "Sig");
        let t = Template::new([(lookalike, SoeStyle::Optional)]);
        let stored = t.entries()[0].field;
        assert_eq!(stored.name(), "TxnSignature");
        assert!(!stored.is_signing());
    }

    #[test]
    fn unregistered_fields_are_rejected() {
        let stray = FieldId::new(SerializedTypeId::UInt32, 200, "Stray");
        assert!(Template::new([(stray, SoeStyle::Optional)]).is_empty());
        assert_eq!(
            Template::try_new([(stray, SoeStyle::Optional)]).unwrap_err(),
            SchemaError::UnregisteredField("Stray")
        );
    }

    #[test]
    fn with_common_appends_common_fields() {
        let t = Template::with_common(
            &[(fields::CHECK_ID.id(), SoeStyle::Required)],
            &[(fields::ACCOUNT.id(), SoeStyle::Required), (fields::FLAGS.id(), SoeStyle::Optional)],
        );
        assert_eq!(t.entries()[0].field, fields::CHECK_ID.id());
        assert_eq!(t.required_fields().count(), 2);
    }
}
