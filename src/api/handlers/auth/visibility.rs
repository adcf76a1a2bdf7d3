//! The shared row-visibility predicate.
//!
//! Every list/read endpoint that returns scoped entities derives a
//! `Visibility` from the caller once and feeds it to its queries; no handler
//! builds its own scope condition. Rows with a NULL scope anchor are globally
//! scoped and visible only to unrestricted callers.

use uuid::Uuid;

use super::role::{Role, ScopeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Rows anchored to this college only.
    College(Uuid),
    /// Rows anchored to this incubator only; may span several colleges.
    Incubator(Uuid),
    /// No restriction (`system_admin`).
    Unrestricted,
}

impl Visibility {
    /// Derive the predicate for a role and its scope anchor.
    ///
    /// Returns `None` when a scoped role is missing its anchor, which is a
    /// data-integrity violation the caller must fail closed on.
    #[must_use]
    pub fn for_role(role: Role, scope: Option<Uuid>) -> Option<Self> {
        match role.scope_kind() {
            ScopeKind::College => scope.map(Self::College),
            ScopeKind::Incubator => scope.map(Self::Incubator),
            ScopeKind::Global => Some(Self::Unrestricted),
        }
    }

    /// Bind parameters for the shared SQL predicate:
    /// `($1::uuid IS NULL OR college_id = $1) AND ($2::uuid IS NULL OR incubator_id = $2)`.
    ///
    /// Equality against a NULL column is false in SQL, so globally scoped
    /// rows drop out for anchored callers without extra conditions.
    #[must_use]
    pub const fn bind_params(&self) -> (Option<Uuid>, Option<Uuid>) {
        match self {
            Self::College(id) => (Some(*id), None),
            Self::Incubator(id) => (None, Some(*id)),
            Self::Unrestricted => (None, None),
        }
    }

    /// In-memory counterpart used for single-row reads.
    #[must_use]
    pub fn allows(&self, college_id: Option<Uuid>, incubator_id: Option<Uuid>) -> bool {
        match self {
            Self::College(id) => college_id == Some(*id),
            Self::Incubator(id) => incubator_id == Some(*id),
            Self::Unrestricted => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn college(n: u128) -> Option<Uuid> {
        Some(Uuid::from_u128(n))
    }

    #[test]
    fn college_roles_get_college_visibility() {
        let anchor = Uuid::from_u128(1);
        for role in [
            Role::Student,
            Role::Mentor,
            Role::CollegeAdmin,
            Role::CollegeCoordinator,
        ] {
            assert_eq!(
                Visibility::for_role(role, Some(anchor)),
                Some(Visibility::College(anchor))
            );
        }
    }

    #[test]
    fn incubator_manager_gets_incubator_visibility() {
        let anchor = Uuid::from_u128(9);
        assert_eq!(
            Visibility::for_role(Role::IncubatorManager, Some(anchor)),
            Some(Visibility::Incubator(anchor))
        );
    }

    #[test]
    fn system_admin_is_unrestricted_with_or_without_anchor() {
        assert_eq!(
            Visibility::for_role(Role::SystemAdmin, None),
            Some(Visibility::Unrestricted)
        );
        assert_eq!(
            Visibility::for_role(Role::SystemAdmin, college(3)),
            Some(Visibility::Unrestricted)
        );
    }

    #[test]
    fn scoped_role_without_anchor_is_rejected() {
        assert_eq!(Visibility::for_role(Role::Student, None), None);
        assert_eq!(Visibility::for_role(Role::IncubatorManager, None), None);
    }

    #[test]
    fn college_filter_keeps_only_matching_rows() {
        // Mixed collection tagged college 1, 2, 1, 3: a college-1 caller
        // must see exactly the two college-1 rows.
        let rows = [college(1), college(2), college(1), college(3)];
        let visibility = Visibility::College(Uuid::from_u128(1));

        let visible: Vec<_> = rows
            .iter()
            .filter(|row| visibility.allows(**row, None))
            .collect();
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|row| **row == college(1)));
    }

    #[test]
    fn incubator_filter_ignores_college_anchors() {
        let incubator = Uuid::from_u128(5);
        let visibility = Visibility::Incubator(incubator);

        assert!(visibility.allows(None, Some(incubator)));
        assert!(visibility.allows(college(1), Some(incubator)));
        assert!(!visibility.allows(college(1), None));
        assert!(!visibility.allows(None, Some(Uuid::from_u128(6))));
    }

    #[test]
    fn null_anchored_rows_are_visible_only_to_unrestricted() {
        let college_view = Visibility::College(Uuid::from_u128(1));
        let incubator_view = Visibility::Incubator(Uuid::from_u128(5));

        assert!(!college_view.allows(None, None));
        assert!(!incubator_view.allows(None, None));
        assert!(Visibility::Unrestricted.allows(None, None));
    }

    #[test]
    fn bind_params_match_variant() {
        let anchor = Uuid::from_u128(4);
        assert_eq!(
            Visibility::College(anchor).bind_params(),
            (Some(anchor), None)
        );
        assert_eq!(
            Visibility::Incubator(anchor).bind_params(),
            (None, Some(anchor))
        );
        assert_eq!(Visibility::Unrestricted.bind_params(), (None, None));
    }
}
