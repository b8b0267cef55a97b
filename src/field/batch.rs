// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pending batch of field writes.

use std::collections::BTreeMap;

use super::{ConflictGroups, Field, FieldId, FieldSet};
use crate::types::{Brightness, ColorTemperature, Hue, Saturation};

/// The latest write per field collected during one debounce window.
///
/// Keys are unique: a second write to the same field replaces the first.
/// Iteration follows [`FieldId`] order, independent of arrival order.
///
/// # Examples
///
/// ```
/// use accessory_coalescer::field::{ConflictGroups, Field, FieldId, PendingBatch};
/// use accessory_coalescer::types::{ColorTemperature, Hue};
///
/// let conflicts = ConflictGroups::default();
/// let mut batch = PendingBatch::new();
///
/// batch.merge(Field::Hue(Hue::new(120).unwrap()), &conflicts);
/// batch.merge(Field::ColorTemperature(ColorTemperature::WARM), &conflicts);
///
/// // The color temperature write evicted the pending hue.
/// assert!(!batch.contains(FieldId::Hue));
/// assert_eq!(batch.color_temperature(), Some(ColorTemperature::WARM));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingBatch {
    fields: BTreeMap<FieldId, Field>,
}

impl PendingBatch {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one write into the batch.
    ///
    /// Pending fields that conflict with `field` are evicted first, then
    /// `field` replaces any pending write with the same identifier. Returns
    /// the set of evicted fields.
    pub fn merge(&mut self, field: Field, conflicts: &ConflictGroups) -> FieldSet {
        let evicted = self.remove_all(conflicts.conflicting_with(field.id()));
        self.fields.insert(field.id(), field);
        evicted
    }

    /// Inserts a write without conflict handling, returning the replaced one.
    pub fn insert(&mut self, field: Field) -> Option<Field> {
        self.fields.insert(field.id(), field)
    }

    /// Removes every field in `ids`, returning the ones that were present.
    pub fn remove_all(&mut self, ids: FieldSet) -> FieldSet {
        let mut removed = FieldSet::EMPTY;
        for id in ids.iter() {
            if self.fields.remove(&id).is_some() {
                removed.insert(id);
            }
        }
        removed
    }

    /// Moves all writes out, leaving the batch empty.
    #[must_use]
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Returns the write for `id`, if pending.
    #[must_use]
    pub fn get(&self, id: FieldId) -> Option<&Field> {
        self.fields.get(&id)
    }

    /// Returns `true` if a write for `id` is pending.
    #[must_use]
    pub fn contains(&self, id: FieldId) -> bool {
        self.fields.contains_key(&id)
    }

    /// Returns the set of pending identifiers.
    #[must_use]
    pub fn ids(&self) -> FieldSet {
        self.fields.keys().copied().collect()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the number of pending writes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Iterates pending writes in [`FieldId`] order.
    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    /// Returns `true` if any pending write in `triggers` asks for power-off.
    #[must_use]
    pub fn requests_off(&self, triggers: FieldSet) -> bool {
        self.iter()
            .any(|field| triggers.contains(field.id()) && field.is_off_request())
    }

    /// Pending power write.
    #[must_use]
    pub fn power(&self) -> Option<bool> {
        match self.get(FieldId::Power) {
            Some(Field::Power(on)) => Some(*on),
            _ => None,
        }
    }

    /// Pending brightness write.
    #[must_use]
    pub fn brightness(&self) -> Option<Brightness> {
        match self.get(FieldId::Brightness) {
            Some(Field::Brightness(b)) => Some(*b),
            _ => None,
        }
    }

    /// Pending hue write.
    #[must_use]
    pub fn hue(&self) -> Option<Hue> {
        match self.get(FieldId::Hue) {
            Some(Field::Hue(h)) => Some(*h),
            _ => None,
        }
    }

    /// Pending saturation write.
    #[must_use]
    pub fn saturation(&self) -> Option<Saturation> {
        match self.get(FieldId::Saturation) {
            Some(Field::Saturation(s)) => Some(*s),
            _ => None,
        }
    }

    /// Pending color temperature write.
    #[must_use]
    pub fn color_temperature(&self) -> Option<ColorTemperature> {
        match self.get(FieldId::ColorTemperature) {
            Some(Field::ColorTemperature(ct)) => Some(*ct),
            _ => None,
        }
    }
}

impl FromIterator<Field> for PendingBatch {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        let mut batch = Self::new();
        for field in iter {
            batch.insert(field);
        }
        batch
    }
}
