//! Permission oracles consulted before a transition may fire.

use std::collections::BTreeSet;

/// Decides whether the caller described by `request` may use a transition
/// guarded by `permission` on `content`.
///
/// Unguarded transitions are passed in as `permission == None`; it is up to
/// the oracle whether those are open to everybody.
pub trait PermissionOracle<T, R>: Send + Sync {
    fn allows(&self, permission: Option<&str>, content: &T, request: &R) -> bool;
}

impl<T, R, F> PermissionOracle<T, R> for F
where
    F: Fn(Option<&str>, &T, &R) -> bool + Send + Sync,
{
    fn allows(&self, permission: Option<&str>, content: &T, request: &R) -> bool {
        self(permission, content, request)
    }
}

/// Oracle that permits everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl<T, R> PermissionOracle<T, R> for AllowAll {
    fn allows(&self, _permission: Option<&str>, _content: &T, _request: &R) -> bool {
        true
    }
}

/// The set of permissions held by a caller. Used as the request type with
/// [`GrantOracle`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grants(BTreeSet<String>);

impl Grants {
    pub fn new<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(permissions.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, permission: &str) -> bool {
        self.0.contains(permission)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Allows unguarded transitions and any permission present in the caller's
/// [`Grants`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GrantOracle;

impl<T> PermissionOracle<T, Grants> for GrantOracle {
    fn allows(&self, permission: Option<&str>, _content: &T, grants: &Grants) -> bool {
        permission.is_none_or(|p| grants.contains(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grant_oracle_checks_membership() {
        let grants = Grants::new(["review", "publish"]);
        assert!(GrantOracle.allows(Some("publish"), &(), &grants));
        assert!(!GrantOracle.allows(Some("retract"), &(), &grants));
    }

    #[test]
    fn grant_oracle_allows_unguarded() {
        assert!(GrantOracle.allows(None, &(), &Grants::default()));
    }

    #[test]
    fn closures_are_oracles() {
        let only_editors = |permission: Option<&str>, _: &(), role: &String| {
            permission.is_none() || role == "editor"
        };
        assert!(only_editors.allows(Some("publish"), &(), &"editor".to_string()));
        assert!(!only_editors.allows(Some("publish"), &(), &"reader".to_string()));
        assert!(only_editors.allows(None, &(), &"reader".to_string()));
    }

    #[test]
    fn grants_iterate_sorted() {
        let grants = Grants::new(["publish", "edit"]);
        assert_eq!(grants.iter().collect::<Vec<_>>(), vec!["edit", "publish"]);
    }
}
