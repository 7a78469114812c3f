//! # Axis Ownership Registry
//!
//! Records which [`InputMethod`] currently drives each axis. A concrete
//! method may own at most one axis at a time; [`InputMethod::None`] is never
//! exclusive.

use super::axis::{AxisId, InputMethod};

/// Axis → input method table, one entry per axis.
///
/// # Examples
///
/// ```
/// use robot_teleop::teleop::{AxisId, InputMethod, OwnershipTable};
///
/// let mut table = OwnershipTable::new();
/// table.assign(AxisId::X, InputMethod::LeftStick);
///
/// assert_eq!(table.conflicting_axis(InputMethod::LeftStick, AxisId::X), None);
/// assert_eq!(
///     table.conflicting_axis(InputMethod::LeftStick, AxisId::Y),
///     Some(AxisId::X)
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnershipTable {
    owners: [InputMethod; 3],
}

impl OwnershipTable {
    /// Creates a table with every axis unassigned.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the method currently driving `axis`.
    #[must_use]
    pub fn owner(&self, axis: AxisId) -> InputMethod {
        self.owners[axis.index()]
    }

    /// Returns the axis, other than `axis`, that already holds `method`.
    ///
    /// `None` methods never conflict. Reclaiming a method for the axis that
    /// already holds it is not a conflict.
    #[must_use]
    pub fn conflicting_axis(&self, method: InputMethod, axis: AxisId) -> Option<AxisId> {
        if method == InputMethod::None {
            return None;
        }
        AxisId::ALL
            .into_iter()
            .find(|&other| other != axis && self.owner(other) == method)
    }

    /// Points `axis` at `method`. Idempotent.
    ///
    /// Callers must check [`conflicting_axis`](Self::conflicting_axis) first;
    /// the table itself does not re-check.
    pub fn assign(&mut self, axis: AxisId, method: InputMethod) {
        self.owners[axis.index()] = method;
    }

    /// Iterates `(axis, owner)` pairs in axis order.
    pub fn iter(&self) -> impl Iterator<Item = (AxisId, InputMethod)> + '_ {
        AxisId::ALL.into_iter().map(move |axis| (axis, self.owner(axis)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_table_is_unassigned() {
        let table = OwnershipTable::new();
        for axis in AxisId::ALL {
            assert_eq!(table.owner(axis), InputMethod::None);
        }
    }

    #[test]
    fn test_none_never_conflicts() {
        let mut table = OwnershipTable::new();
        table.assign(AxisId::X, InputMethod::None);
        table.assign(AxisId::Y, InputMethod::None);

        assert_eq!(table.conflicting_axis(InputMethod::None, AxisId::Drive), None);
    }

    #[test]
    fn test_same_axis_reclaim_is_allowed() {
        let mut table = OwnershipTable::new();
        table.assign(AxisId::Drive, InputMethod::Touchpad);

        assert_eq!(table.conflicting_axis(InputMethod::Touchpad, AxisId::Drive), None);
    }

    #[test]
    fn test_other_axis_holding_method_conflicts() {
        let mut table = OwnershipTable::new();
        table.assign(AxisId::Y, InputMethod::Dpad);

        assert_eq!(
            table.conflicting_axis(InputMethod::Dpad, AxisId::X),
            Some(AxisId::Y)
        );
        assert_eq!(
            table.conflicting_axis(InputMethod::Dpad, AxisId::Drive),
            Some(AxisId::Y)
        );
    }

    #[test]
    fn test_reassign_releases_previous_method() {
        let mut table = OwnershipTable::new();
        table.assign(AxisId::X, InputMethod::LeftStick);
        table.assign(AxisId::X, InputMethod::Dpad);

        assert_eq!(table.conflicting_axis(InputMethod::LeftStick, AxisId::Y), None);
        assert_eq!(table.owner(AxisId::X), InputMethod::Dpad);
    }

    #[test]
    fn test_iter_yields_every_axis() {
        let mut table = OwnershipTable::new();
        table.assign(AxisId::Drive, InputMethod::Triggers);

        let entries: Vec<_> = table.iter().collect();
        assert_eq!(
            entries,
            vec![
                (AxisId::X, InputMethod::None),
                (AxisId::Y, InputMethod::None),
                (AxisId::Drive, InputMethod::Triggers),
            ]
        );
    }
}
