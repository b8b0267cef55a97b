// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Field sets and conflict groups.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::FieldId;
use crate::error::ConfigError;

/// A set of [`FieldId`]s.
///
/// # Examples
///
/// ```
/// use accessory_coalescer::field::{FieldId, FieldSet};
///
/// let color = FieldSet::of(&[FieldId::Hue, FieldId::Saturation]);
/// assert!(color.contains(FieldId::Hue));
/// assert!(!color.contains(FieldId::Brightness));
/// assert_eq!(color.len(), 2);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<FieldId>", into = "Vec<FieldId>")]
pub struct FieldSet(u8);

impl FieldSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Every field.
    pub const ALL: Self = Self::of(&FieldId::ALL);

    /// Builds a set from a slice of identifiers.
    #[must_use]
    pub const fn of(ids: &[FieldId]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < ids.len() {
            bits |= ids[i].bit();
            i += 1;
        }
        Self(bits)
    }

    /// Returns a copy of this set with `id` added.
    #[must_use]
    pub const fn with(self, id: FieldId) -> Self {
        Self(self.0 | id.bit())
    }

    /// Adds `id` to the set.
    pub fn insert(&mut self, id: FieldId) {
        self.0 |= id.bit();
    }

    /// Returns `true` if `id` is in the set.
    #[must_use]
    pub const fn contains(&self, id: FieldId) -> bool {
        self.0 & id.bit() != 0
    }

    /// Returns `true` if both sets share at least one field.
    #[must_use]
    pub const fn intersects(&self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns the union of both sets.
    #[must_use]
    pub const fn union(&self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns `true` if the set is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns the number of fields in the set.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates the members in [`FieldId`] order.
    pub fn iter(&self) -> impl Iterator<Item = FieldId> + '_ {
        FieldId::ALL.into_iter().filter(|id| self.contains(*id))
    }
}

impl fmt::Debug for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, id) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(id.as_str())?;
        }
        f.write_str("}")
    }
}

impl FromIterator<FieldId> for FieldSet {
    fn from_iter<I: IntoIterator<Item = FieldId>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl From<Vec<FieldId>> for FieldSet {
    fn from(ids: Vec<FieldId>) -> Self {
        ids.into_iter().collect()
    }
}

impl From<FieldSet> for Vec<FieldId> {
    fn from(set: FieldSet) -> Self {
        set.iter().collect()
    }
}

/// Declared mutually exclusive field groups.
///
/// Every declared group conflicts with every other declared group. A write to
/// a field in one group evicts pending writes to fields of all the other
/// groups, so a flushed batch never holds fields from two groups.
///
/// The default declares color temperature against hue/saturation.
///
/// # Examples
///
/// ```
/// use accessory_coalescer::field::{ConflictGroups, FieldId, FieldSet};
///
/// let groups = ConflictGroups::default();
/// assert_eq!(
///     groups.conflicting_with(FieldId::ColorTemperature),
///     FieldSet::of(&[FieldId::Hue, FieldId::Saturation])
/// );
/// assert!(groups.conflicting_with(FieldId::Brightness).is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConflictGroups(Vec<FieldSet>);

impl ConflictGroups {
    /// Declares the given groups as mutually exclusive.
    #[must_use]
    pub fn new(groups: Vec<FieldSet>) -> Self {
        Self(groups)
    }

    /// No conflicts at all.
    #[must_use]
    pub fn none() -> Self {
        Self(Vec::new())
    }

    /// Returns the declared groups.
    #[must_use]
    pub fn groups(&self) -> &[FieldSet] {
        &self.0
    }

    /// Returns every field that a write to `id` evicts from a pending batch.
    #[must_use]
    pub fn conflicting_with(&self, id: FieldId) -> FieldSet {
        if !self.0.iter().any(|group| group.contains(id)) {
            return FieldSet::EMPTY;
        }
        self.0
            .iter()
            .filter(|group| !group.contains(id))
            .fold(FieldSet::EMPTY, |acc, group| acc.union(*group))
    }

    /// Checks that no group is empty and no field is in two groups.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = FieldSet::EMPTY;
        for (index, group) in self.0.iter().enumerate() {
            if group.is_empty() {
                return Err(ConfigError::EmptyConflictGroup(index));
            }
            if let Some(shared) = group.iter().find(|id| seen.contains(*id)) {
                return Err(ConfigError::OverlappingConflictGroups {
                    field: shared.to_string(),
                });
            }
            seen = seen.union(*group);
        }
        Ok(())
    }
}

impl Default for ConflictGroups {
    fn default() -> Self {
        Self(vec![
            FieldSet::of(&[FieldId::ColorTemperature]),
            FieldSet::of(&[FieldId::Hue, FieldId::Saturation]),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_membership() {
        let mut set = FieldSet::EMPTY;
        assert!(set.is_empty());
        set.insert(FieldId::Power);
        assert!(set.contains(FieldId::Power));
        assert_eq!(set.with(FieldId::Hue).len(), 2);
        assert_eq!(FieldSet::ALL.len(), 5);
    }

    #[test]
    fn set_iterates_in_field_order() {
        let set = FieldSet::of(&[FieldId::ColorTemperature, FieldId::Power]);
        let ids: Vec<_> = set.iter().collect();
        assert_eq!(ids, vec![FieldId::Power, FieldId::ColorTemperature]);
        assert_eq!(set.to_string(), "{power, color-temperature}");
    }

    #[test]
    fn set_serde_as_list() {
        let set = FieldSet::of(&[FieldId::Hue, FieldId::Saturation]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["hue","saturation"]"#);
        let back: FieldSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn default_conflicts_are_symmetric() {
        let groups = ConflictGroups::default();
        assert_eq!(
            groups.conflicting_with(FieldId::Hue),
            FieldSet::of(&[FieldId::ColorTemperature])
        );
        assert_eq!(
            groups.conflicting_with(FieldId::Saturation),
            FieldSet::of(&[FieldId::ColorTemperature])
        );
        assert_eq!(
            groups.conflicting_with(FieldId::ColorTemperature),
            FieldSet::of(&[FieldId::Hue, FieldId::Saturation])
        );
    }

    #[test]
    fn ungrouped_fields_have_no_conflicts() {
        let groups = ConflictGroups::default();
        assert!(groups.conflicting_with(FieldId::Power).is_empty());
        assert!(ConflictGroups::none()
            .conflicting_with(FieldId::Hue)
            .is_empty());
    }

    #[test]
    fn three_groups_all_conflict() {
        let groups = ConflictGroups::new(vec![
            FieldSet::of(&[FieldId::ColorTemperature]),
            FieldSet::of(&[FieldId::Hue]),
            FieldSet::of(&[FieldId::Saturation]),
        ]);
        assert_eq!(
            groups.conflicting_with(FieldId::Hue),
            FieldSet::of(&[FieldId::ColorTemperature, FieldId::Saturation])
        );
    }

    #[test]
    fn validate_rejects_bad_groups() {
        assert!(ConflictGroups::default().validate().is_ok());

        let empty = ConflictGroups::new(vec![FieldSet::EMPTY]);
        assert_eq!(empty.validate(), Err(ConfigError::EmptyConflictGroup(0)));

        let overlap = ConflictGroups::new(vec![
            FieldSet::of(&[FieldId::Hue]),
            FieldSet::of(&[FieldId::Hue, FieldId::Saturation]),
        ]);
        assert_eq!(
            overlap.validate(),
            Err(ConfigError::OverlappingConflictGroups {
                field: "hue".to_string()
            })
        );
    }
}
