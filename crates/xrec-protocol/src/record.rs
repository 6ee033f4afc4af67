//! The typed field container.
//!
//! A [`Record`] is either *free* (no template, any field may be added) or
//! *bound* to a [`Template`]. A bound record keeps one slot per declared
//! field in template order; absent fields hold [`Value::NotPresent`].

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use tracing::debug;
use xrec_types::{FieldId, SerializedTypeId};

use crate::error::{RecordError, RecordResult};
use crate::fields::{self, TypedField};
use crate::formats;
use crate::template::{SoeStyle, Template};
use crate::value::{FieldType, Value};

/// One `(field, value)` pair held by a record.
#[derive(Clone, Debug, PartialEq)]
pub struct Slot {
    pub(crate) field: FieldId,
    pub(crate) value: Value,
}

impl Slot {
    fn absent(field: FieldId) -> Self {
        Self {
            field,
            value: Value::NotPresent,
        }
    }

    pub fn field(&self) -> &FieldId {
        &self.field
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

#[derive(Clone)]
pub struct Record {
    name: FieldId,
    template: Option<Arc<Template>>,
    pub(crate) slots: Vec<Slot>,
}

impl Record {
    /// An empty free record stored under `name`.
    pub fn new(name: FieldId) -> Self {
        Self {
            name,
            template: None,
            slots: Vec::new(),
        }
    }

    /// A record bound to `template`. Required fields start at their kind's
    /// default; every other declared field starts absent.
    pub fn from_template(template: Arc<Template>, name: FieldId) -> Self {
        let slots = template
            .entries()
            .iter()
            .map(|entry| Slot {
                field: entry.field,
                value: match entry.style {
                    SoeStyle::Required => default_value(&entry.field),
                    _ => Value::NotPresent,
                },
            })
            .collect();
        Self {
            name,
            template: Some(template),
            slots,
        }
    }

    pub fn name(&self) -> &FieldId {
        &self.name
    }

    pub fn set_name(&mut self, name: FieldId) {
        self.name = name;
    }

    pub fn template(&self) -> Option<&Arc<Template>> {
        self.template.as_ref()
    }

    pub fn is_free(&self) -> bool {
        self.template.is_none()
    }

    /// Number of slots, including absent ones.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All slots in storage order.
    pub fn iter(&self) -> std::slice::Iter<'_, Slot> {
        self.slots.iter()
    }

    /// Slots that hold a value, in storage order.
    pub fn present_fields(&self) -> impl Iterator<Item = (&FieldId, &Value)> {
        self.slots
            .iter()
            .filter(|s| s.value.is_present())
            .map(|s| (&s.field, &s.value))
    }

    pub fn field_index(&self, field: &FieldId) -> Option<usize> {
        self.slots.iter().position(|s| s.field == *field)
    }

    /// Presence rule for `field`. Free records answer
    /// [`SoeStyle::Invalid`] for every field.
    pub fn style_of(&self, field: &FieldId) -> RecordResult<SoeStyle> {
        match &self.template {
            None => Ok(SoeStyle::Invalid),
            Some(t) => t
                .style(field)
                .ok_or(RecordError::FieldNotDeclared { field: field.name() }),
        }
    }

    /// Raw slot contents, `NotPresent` included.
    pub fn peek_field(&self, field: &FieldId) -> Option<&Value> {
        self.field_index(field).map(|i| &self.slots[i].value)
    }

    pub fn is_field_present(&self, field: &FieldId) -> bool {
        self.peek_field(field).is_some_and(Value::is_present)
    }

    /// Value of `field`. An absent `Default` field reads as its kind's
    /// default value; any other absent field is [`RecordError::FieldMissing`].
    pub fn get_field(&self, field: &FieldId) -> RecordResult<Cow<'_, Value>> {
        let style = self.style_of(field)?;
        match self.peek_field(field) {
            Some(value) if value.is_present() => Ok(Cow::Borrowed(value)),
            _ if style == SoeStyle::Default => Ok(Cow::Owned(default_value(field))),
            _ => Err(RecordError::FieldMissing { field: field.name() }),
        }
    }

    /// Store `value` under `field`.
    ///
    /// A `Default` field given its default value becomes absent. The slot
    /// always records the registered identity, so an equal `FieldId` built
    /// elsewhere cannot change the field's name or signing flag.
    pub fn set_field(&mut self, field: FieldId, value: Value) -> RecordResult<()> {
        if value.kind() != field.kind() {
            return Err(RecordError::WrongFieldType {
                field: field.name(),
                expected: field.kind(),
                actual: value.kind(),
            });
        }
        let style = self.style_of(&field)?;
        if style == SoeStyle::Default && value.is_default() {
            if let Some(i) = self.field_index(&field) {
                self.slots[i].value = Value::NotPresent;
            }
            return Ok(());
        }
        let i = self.ensure_slot(&field)?;
        self.slots[i].value = value;
        Ok(())
    }

    /// Ensure `field` holds a value, materializing its kind's default when
    /// absent, and return it for in-place mutation.
    pub fn make_field_present(&mut self, field: &FieldId) -> RecordResult<&mut Value> {
        if field.kind() == SerializedTypeId::NotPresent {
            return Err(RecordError::template(field.name(), "has no wire type"));
        }
        let i = self.ensure_slot(field)?;
        let slot = &mut self.slots[i];
        if !slot.value.is_present() {
            slot.value = default_value(field);
        }
        Ok(&mut slot.value)
    }

    /// Mark `field` absent, keeping its slot.
    pub fn make_field_absent(&mut self, field: &FieldId) -> RecordResult<()> {
        let style = self.removable_style(field)?;
        match self.field_index(field) {
            Some(i) => {
                self.slots[i].value = Value::NotPresent;
                Ok(())
            }
            None if style == SoeStyle::Invalid => {
                Err(RecordError::FieldMissing { field: field.name() })
            }
            None => Ok(()),
        }
    }

    /// Remove `field`: absent in a bound record, slot deleted in a free one.
    pub fn clear(&mut self, field: &FieldId) -> RecordResult<()> {
        match self.removable_style(field)? {
            SoeStyle::Invalid => {
                self.del_field(field);
                Ok(())
            }
            _ => self.make_field_absent(field),
        }
    }

    fn removable_style(&self, field: &FieldId) -> RecordResult<SoeStyle> {
        match self.style_of(field)? {
            style @ (SoeStyle::Required | SoeStyle::Default) => Err(RecordError::template(
                field.name(),
                format!("{} field cannot be removed", style.name()),
            )),
            style => Ok(style),
        }
    }

    /// Delete the slot of `field`. Returns whether a slot was removed.
    pub fn del_field(&mut self, field: &FieldId) -> bool {
        match self.field_index(field) {
            Some(i) => {
                self.slots.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn del_field_at(&mut self, index: usize) -> Option<Slot> {
        (index < self.slots.len()).then(|| self.slots.remove(index))
    }

    /// Append a slot without ordering it. The value must match the field's
    /// kind, and a bound record only accepts declared fields.
    pub fn push(&mut self, field: FieldId, value: Value) -> RecordResult<usize> {
        if value.is_present() && value.kind() != field.kind() {
            return Err(RecordError::WrongFieldType {
                field: field.name(),
                expected: field.kind(),
                actual: value.kind(),
            });
        }
        self.style_of(&field)?;
        let field = registered(&field)?;
        self.slots.push(Slot { field, value });
        Ok(self.slots.len() - 1)
    }

    fn ensure_slot(&mut self, field: &FieldId) -> RecordResult<usize> {
        if let Some(i) = self.field_index(field) {
            return Ok(i);
        }
        self.style_of(field)?;
        let field = registered(field)?;
        let at = match &self.template {
            Some(t) => {
                let target = t.position(&field);
                self.slots
                    .iter()
                    .position(|s| t.position(&s.field) > target)
                    .unwrap_or(self.slots.len())
            }
            None => self.slots.len(),
        };
        self.slots.insert(at, Slot::absent(field));
        Ok(at)
    }

    /// Bind this record to `template`, reordering slots to match it.
    ///
    /// Faults when a required field is absent, when a `Default` field holds
    /// its default explicitly, or when a present field is not declared. The
    /// record is left untouched on fault.
    pub fn apply_template(&mut self, template: Arc<Template>) -> RecordResult<()> {
        for entry in template.entries() {
            let mut present = self
                .slots
                .iter()
                .filter(|s| s.field == entry.field && s.value.is_present());
            let value = present.next().map(|s| &s.value);
            if present.next().is_some() {
                return Err(violation(&entry.field, "appears more than once"));
            }
            match (entry.style, value) {
                (SoeStyle::Required, None) => {
                    return Err(violation(&entry.field, "is required but missing"));
                }
                (SoeStyle::Default, Some(v)) if v.is_default() => {
                    return Err(violation(
                        &entry.field,
                        "may not be explicitly set to its default",
                    ));
                }
                _ => {}
            }
        }
        if let Some(extra) = self
            .slots
            .iter()
            .find(|s| s.value.is_present() && !template.contains(&s.field))
        {
            return Err(violation(&extra.field, "is not declared by the template"));
        }

        let mut old: Vec<Option<Slot>> = std::mem::take(&mut self.slots)
            .into_iter()
            .map(Some)
            .collect();
        self.slots = template
            .entries()
            .iter()
            .map(|entry| {
                old.iter_mut()
                    .find(|s| {
                        s.as_ref()
                            .is_some_and(|s| s.field == entry.field && s.value.is_present())
                    })
                    .and_then(Option::take)
                    .unwrap_or_else(|| Slot::absent(entry.field))
            })
            .collect();
        self.template = Some(template);
        Ok(())
    }

    /// Apply the catalog's inner template for `field`, if it has one.
    pub fn apply_template_from_field(&mut self, field: &FieldId) -> RecordResult<()> {
        match formats::inner_object(field) {
            Some(template) => self.apply_template(template.clone()),
            None => Ok(()),
        }
    }

    // Typed access

    pub fn get<T: FieldType>(&self, field: &TypedField<T>) -> RecordResult<T> {
        self.typed_ref::<T>(field).map(Cow::into_owned)
    }

    /// Borrowing variant of [`get`](Self::get).
    pub fn get_ref<T: FieldType>(&self, field: &TypedField<T>) -> RecordResult<Cow<'_, T>> {
        self.typed_ref::<T>(field)
    }

    /// Read an untyped field as `T`, checking the stored kind at runtime.
    pub fn get_as<T: FieldType>(&self, field: &FieldId) -> RecordResult<T> {
        self.typed_ref::<T>(field).map(Cow::into_owned)
    }

    fn typed_ref<T: FieldType>(&self, field: &FieldId) -> RecordResult<Cow<'_, T>> {
        let style = self.style_of(field)?;
        match self.peek_field(field) {
            Some(value) if value.is_present() => T::from_value(value)
                .map(Cow::Borrowed)
                .ok_or(RecordError::WrongFieldType {
                    field: field.name(),
                    expected: T::KIND,
                    actual: value.kind(),
                }),
            _ if style == SoeStyle::Default => {
                if T::KIND != field.kind() {
                    return Err(RecordError::WrongFieldType {
                        field: field.name(),
                        expected: T::KIND,
                        actual: field.kind(),
                    });
                }
                Ok(Cow::Owned(T::default()))
            }
            _ => Err(RecordError::FieldMissing { field: field.name() }),
        }
    }

    /// `None` when the field is absent, except that an absent `Default`
    /// field reads as `Some(default)`.
    pub fn get_optional<T: FieldType>(&self, field: &TypedField<T>) -> Option<T> {
        match self.peek_field(field) {
            Some(value) if value.is_present() => T::from_value(value).cloned(),
            _ => match self.style_of(field) {
                Ok(SoeStyle::Default) => Some(T::default()),
                _ => None,
            },
        }
    }

    pub fn set<T: FieldType>(&mut self, field: &TypedField<T>, value: T) -> RecordResult<()> {
        self.set_field(field.id(), value.into_value())
    }

    /// Mutable access to a field's payload, materializing it when absent.
    pub fn peek_mut<T: FieldType>(&mut self, field: &TypedField<T>) -> RecordResult<&mut T> {
        let name = field.name();
        let value = self.make_field_present(field)?;
        let actual = value.kind();
        T::from_value_mut(value).ok_or(RecordError::WrongFieldType {
            field: name,
            expected: T::KIND,
            actual,
        })
    }

    /// Whether `field` is present and equal to `value`.
    pub fn has_matching_entry(&self, field: &FieldId, value: &Value) -> bool {
        self.peek_field(field)
            .is_some_and(|v| v.is_present() && v == value)
    }

    // Flags

    pub fn flags(&self) -> u32 {
        self.get_optional(&fields::FLAGS).unwrap_or(0)
    }

    /// Set bits in `Flags`, materializing the field when absent.
    pub fn set_flag(&mut self, flag: u32) -> RecordResult<()> {
        let flags = self.flags() | flag;
        self.set(&fields::FLAGS, flags)
    }

    pub fn clear_flag(&mut self, flag: u32) -> RecordResult<()> {
        let flags = self.flags();
        if flags & flag == 0 {
            return Ok(());
        }
        self.set(&fields::FLAGS, flags & !flag)
    }

    pub fn is_flag(&self, flag: u32) -> bool {
        self.flags() & flag == flag
    }

    /// Present slots in canonical order, omitting `Default` fields that hold
    /// their default. Equality and serialization both see exactly this set.
    pub(crate) fn effective_slots(&self) -> Vec<&Slot> {
        let mut slots: Vec<&Slot> = self
            .slots
            .iter()
            .filter(|s| s.value.is_present())
            .filter(|s| {
                !(s.value.is_default()
                    && self.template.as_ref().and_then(|t| t.style(&s.field))
                        == Some(SoeStyle::Default))
            })
            .collect();
        slots.sort_by(|a, b| a.field.cmp(&b.field));
        slots
    }

    /// Comma-separated values of the present fields.
    pub fn text(&self) -> String {
        let parts: Vec<String> = self.present_fields().map(|(_, v)| v.to_string()).collect();
        format!("{{{}}}", parts.join(", "))
    }

    /// Rendering prefixed with the record's own name.
    pub fn full_text(&self) -> String {
        if self.name.is_generic() {
            self.to_string()
        } else {
            format!("{} = {}", self.name, self)
        }
    }
}

/// Only registered fields can be stored, since only they decode.
fn registered(field: &FieldId) -> RecordResult<FieldId> {
    fields::resolve(field).ok_or(RecordError::FieldNotDeclared { field: field.name() })
}

fn violation(field: &FieldId, reason: &str) -> RecordError {
    debug!(field = field.name(), reason, "template violation");
    RecordError::template(field.name(), reason)
}

/// Default value for a field; nested objects are named after the field.
fn default_value(field: &FieldId) -> Value {
    match field.kind() {
        SerializedTypeId::Object => Value::Object(Record::new(*field)),
        kind => Value::default_for(kind),
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new(FieldId::GENERIC)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        let a = self.effective_slots();
        let b = other.effective_slots();
        a.len() == b.len()
            && a
                .iter()
                .zip(b.iter())
                .all(|(x, y)| x.field == y.field && x.value == y.value)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("name", &self.name.name())
            .field("bound", &self.template.is_some())
            .field("slots", &self.slots)
            .finish()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (field, value)) in self.present_fields().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{field} = {value}")?;
        }
        f.write_str("}")
    }
}
