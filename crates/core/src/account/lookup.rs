//! Accounts as seen by the core, and the lookup contract for them.
//!
//! The account hierarchy itself is owned by an external collaborator. The
//! core only asks which of a set of paths are usable, in one call, so that
//! every missing or inactive reference can be reported together.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::path::AccountPath;

/// An account reference with its activity flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// The account's full path.
    pub path: AccountPath,
    /// Parent path, `None` for top-level accounts.
    pub parent_path: Option<AccountPath>,
    /// Number of path segments.
    pub depth: usize,
    /// Whether postings may reference this account.
    pub active: bool,
}

impl Account {
    /// Creates an active account, deriving parent and depth from the path.
    #[must_use]
    pub fn new(path: AccountPath) -> Self {
        Self {
            parent_path: path.parent(),
            depth: path.depth(),
            path,
            active: true,
        }
    }

    /// Returns a deactivated copy.
    #[must_use]
    pub fn deactivated(&self) -> Self {
        Self {
            active: false,
            ..self.clone()
        }
    }

    /// Capability predicate for the hierarchy owner: an account may be
    /// deactivated only without active children and recent transactions.
    #[must_use]
    pub fn can_deactivate(&self, has_active_children: bool, has_recent_transactions: bool) -> bool {
        self.active && !has_active_children && !has_recent_transactions
    }
}

/// Resolves which referenced accounts exist and are active.
pub trait AccountLookup {
    /// Returns the subset of `paths` that exist and are active.
    fn find_active(&self, paths: &BTreeSet<AccountPath>) -> BTreeSet<AccountPath>;

    /// Returns every path of `paths` that is missing or inactive, sorted.
    fn missing_or_inactive(&self, paths: &BTreeSet<AccountPath>) -> Vec<AccountPath> {
        let found = self.find_active(paths);
        paths.difference(&found).cloned().collect()
    }
}

impl<F> AccountLookup for F
where
    F: Fn(&BTreeSet<AccountPath>) -> BTreeSet<AccountPath>,
{
    fn find_active(&self, paths: &BTreeSet<AccountPath>) -> BTreeSet<AccountPath> {
        self(paths)
    }
}

/// A simple in-memory account registry.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccounts {
    accounts: BTreeMap<AccountPath, Account>,
}

impl InMemoryAccounts {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with one active account per raw path.
    #[must_use]
    pub fn with_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        paths
            .into_iter()
            .map(|raw| Account::new(AccountPath::normalize(raw.as_ref())))
            .collect()
    }

    /// Inserts or replaces an account.
    pub fn insert(&mut self, account: Account) {
        self.accounts.insert(account.path.clone(), account);
    }

    /// Marks an account inactive. Returns false if it is unknown.
    pub fn deactivate(&mut self, path: &AccountPath) -> bool {
        match self.accounts.get_mut(path) {
            Some(account) => {
                account.active = false;
                true
            }
            None => false,
        }
    }

    /// Looks up one account.
    #[must_use]
    pub fn get(&self, path: &AccountPath) -> Option<&Account> {
        self.accounts.get(path)
    }

    /// Direct children of `path`.
    pub fn children<'a>(&'a self, path: &'a AccountPath) -> impl Iterator<Item = &'a Account> + 'a {
        self.accounts
            .values()
            .filter(move |account| account.parent_path.as_ref() == Some(path))
    }

    /// True if any direct child of `path` is active.
    #[must_use]
    pub fn has_active_children(&self, path: &AccountPath) -> bool {
        self.children(path).any(|child| child.active)
    }

    /// All accounts, ordered by path.
    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }
}

impl FromIterator<Account> for InMemoryAccounts {
    fn from_iter<T: IntoIterator<Item = Account>>(iter: T) -> Self {
        let mut registry = Self::new();
        for account in iter {
            registry.insert(account);
        }
        registry
    }
}

impl AccountLookup for InMemoryAccounts {
    fn find_active(&self, paths: &BTreeSet<AccountPath>) -> BTreeSet<AccountPath> {
        paths
            .iter()
            .filter(|path| self.accounts.get(*path).is_some_and(|account| account.active))
            .cloned()
            .collect()
    }
}
