//! Mutually exclusive services.
//!
//! Each group lists services of which at most one may be selected at a time
//! (e.g. a simple and a detailed wash). Groups are small and few, so every
//! check is a linear scan.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::ServiceId;

/// The set of exclusion groups in force.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExclusionRules {
    groups: Vec<Vec<ServiceId>>,
}

impl Default for ExclusionRules {
    /// Washes {1, 2}, polishes {9, 10}, engine washes {3, 4}.
    fn default() -> Self {
        Self::new(vec![
            vec![ServiceId::new(1), ServiceId::new(2)],
            vec![ServiceId::new(9), ServiceId::new(10)],
            vec![ServiceId::new(3), ServiceId::new(4)],
        ])
    }
}

impl ExclusionRules {
    /// Build from explicit groups. Groups with fewer than two members exclude
    /// nothing and are dropped.
    #[must_use]
    pub fn new(groups: Vec<Vec<ServiceId>>) -> Self {
        Self {
            groups: groups.into_iter().filter(|g| g.len() > 1).collect(),
        }
    }

    /// No exclusions at all.
    #[must_use]
    pub const fn none() -> Self {
        Self { groups: Vec::new() }
    }

    #[must_use]
    pub fn groups(&self) -> &[Vec<ServiceId>] {
        &self.groups
    }

    /// Services that cannot be selected given what is already selected.
    ///
    /// For every group with a selected member, the other members are
    /// disabled. When a group somehow has several selected members, the
    /// first one in group order is treated as the selection.
    #[must_use]
    pub fn disabled_ids(&self, selected: &[ServiceId]) -> BTreeSet<ServiceId> {
        let mut disabled = BTreeSet::new();
        for group in &self.groups {
            if let Some(chosen) = group.iter().find(|id| selected.contains(id)) {
                disabled.extend(group.iter().filter(|id| *id != chosen).copied());
            }
        }
        disabled
    }

    /// The selected service that blocks `service_id`, if any.
    #[must_use]
    pub fn conflicting(&self, service_id: ServiceId, selected: &[ServiceId]) -> Option<ServiceId> {
        self.groups
            .iter()
            .filter(|group| group.contains(&service_id))
            .find_map(|group| {
                group
                    .iter()
                    .find(|id| **id != service_id && selected.contains(id))
                    .copied()
            })
    }

    /// Staff-facing text explaining why `service_id` is blocked, e.g.
    /// `Incompatível com "Lavagem Simples"`.
    ///
    /// `name_of` resolves a service id to its name; unknown ids are shown
    /// as the bare id.
    pub fn exclusion_reason<F>(
        &self,
        service_id: ServiceId,
        selected: &[ServiceId],
        name_of: F,
    ) -> Option<String>
    where
        F: Fn(ServiceId) -> Option<String>,
    {
        self.conflicting(service_id, selected).map(|other| {
            let name = name_of(other).unwrap_or_else(|| other.to_string());
            format!("Incompatível com \"{name}\"")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[i32]) -> Vec<ServiceId> {
        raw.iter().copied().map(ServiceId::new).collect()
    }

    #[test]
    fn test_disabled_ids_for_default_groups() {
        let rules = ExclusionRules::default();

        assert!(rules.disabled_ids(&[]).is_empty());
        assert_eq!(
            rules.disabled_ids(&ids(&[1])).into_iter().collect::<Vec<_>>(),
            ids(&[2])
        );
        assert_eq!(
            rules.disabled_ids(&ids(&[2, 10, 5])).into_iter().collect::<Vec<_>>(),
            ids(&[1, 9])
        );
    }

    #[test]
    fn test_first_member_in_group_order_wins() {
        let rules = ExclusionRules::new(vec![ids(&[1, 2, 3])]);
        let disabled = rules.disabled_ids(&ids(&[3, 1]));
        assert_eq!(disabled.into_iter().collect::<Vec<_>>(), ids(&[2, 3]));
    }

    #[test]
    fn test_exclusion_reason_uses_name() {
        let rules = ExclusionRules::default();
        let name_of = |id: ServiceId| (id == ServiceId::new(1)).then(|| "Lavagem Simples".to_owned());

        assert_eq!(
            rules.exclusion_reason(ServiceId::new(2), &ids(&[1]), name_of),
            Some("Incompatível com \"Lavagem Simples\"".to_owned())
        );
        assert_eq!(
            rules.exclusion_reason(ServiceId::new(10), &ids(&[9]), name_of),
            Some("Incompatível com \"9\"".to_owned())
        );
        assert_eq!(rules.exclusion_reason(ServiceId::new(1), &ids(&[1]), name_of), None);
        assert_eq!(rules.exclusion_reason(ServiceId::new(5), &ids(&[1]), name_of), None);
    }

    #[test]
    fn test_singleton_groups_are_dropped() {
        let rules = ExclusionRules::new(vec![ids(&[7]), ids(&[1, 2])]);
        assert_eq!(rules.groups().len(), 1);
        assert_eq!(ExclusionRules::none().disabled_ids(&ids(&[1])).len(), 0);
    }
}
