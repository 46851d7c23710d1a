//! # Account State Cache
//!
//! Accounts are stored by address. A second set maps public keys to
//! addresses so that an account is reachable by either identity.
//!
//! Account resolution by key is canonical everywhere: the key lookup first,
//! then the address derived from the key on the cache's network.

use crate::domain::{
    AccountState, BaseSet, BaseSetView, ChangeSummary, DeltaElements, DeltaSet, ReadOnlyCache,
    ReadOnlySet,
};
use crate::ports::{ReadOnlySubCache, SubCache};
use shared_types::{public_key_to_address, Address, Height, Key, NetworkIdentifier};

/// Committed accounts.
pub struct AccountStateCache {
    network: NetworkIdentifier,
    accounts: BaseSet<Address, AccountState>,
    key_lookup: BaseSet<Key, Address>,
}

impl AccountStateCache {
    pub fn new(network: NetworkIdentifier) -> Self {
        Self {
            network,
            accounts: BaseSet::new(),
            key_lookup: BaseSet::new(),
        }
    }

    /// Seeds the cache with `accounts` (nemesis state, tests).
    pub fn with_accounts(
        network: NetworkIdentifier,
        accounts: impl IntoIterator<Item = AccountState>,
    ) -> Self {
        let accounts: Vec<AccountState> = accounts.into_iter().collect();
        let key_lookup = accounts
            .iter()
            .filter_map(|account| account.public_key.map(|key| (key, account.address)))
            .collect();

        Self {
            network,
            accounts: accounts
                .into_iter()
                .map(|account| (account.address, account))
                .collect(),
            key_lookup,
        }
    }

    pub fn network_identifier(&self) -> NetworkIdentifier {
        self.network
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl SubCache for AccountStateCache {
    type View = AccountStateCacheView;
    type Delta = AccountStateCacheDelta;
    const NAME: &'static str = "AccountStateCache";

    fn create_view(&self) -> Self::View {
        AccountStateCacheView {
            network: self.network,
            accounts: self.accounts.view(),
            key_lookup: self.key_lookup.view(),
        }
    }

    fn create_delta(&self) -> Self::Delta {
        AccountStateCacheDelta {
            network: self.network,
            accounts: self.accounts.rebase(),
            key_lookup: self.key_lookup.rebase(),
        }
    }

    fn change_summary(delta: &Self::Delta) -> ChangeSummary {
        delta.deltas().summary()
    }

    fn commit(&mut self, delta: Self::Delta) {
        self.accounts.commit(delta.accounts);
        self.key_lookup.commit(delta.key_lookup);
    }
}

/// Snapshot of committed accounts.
pub struct AccountStateCacheView {
    network: NetworkIdentifier,
    accounts: BaseSetView<Address, AccountState>,
    key_lookup: BaseSetView<Key, Address>,
}

impl AccountStateCacheView {
    pub fn network_identifier(&self) -> NetworkIdentifier {
        self.network
    }

    pub fn find_by_address(&self, address: &Address) -> Option<&AccountState> {
        self.accounts.find(address)
    }

    pub fn find_by_key(&self, key: &Key) -> Option<&AccountState> {
        let address = self.key_lookup.find(key)?;
        self.accounts.find(address)
    }

    pub fn len(&self) -> usize {
        self.accounts.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Working layer over accounts.
pub struct AccountStateCacheDelta {
    network: NetworkIdentifier,
    accounts: DeltaSet<Address, AccountState>,
    key_lookup: DeltaSet<Key, Address>,
}

impl AccountStateCacheDelta {
    pub fn network_identifier(&self) -> NetworkIdentifier {
        self.network
    }

    pub fn find_by_address(&self, address: &Address) -> Option<&AccountState> {
        self.accounts.find(address)
    }

    pub fn find_by_key(&self, key: &Key) -> Option<&AccountState> {
        let address = self.key_lookup.find(key)?;
        self.accounts.find(address)
    }

    pub fn find_mut_by_address(&mut self, address: &Address) -> Option<&mut AccountState> {
        self.accounts.find_mut(address)
    }

    /// Resolves by key lookup, then by derived address.
    pub fn find_mut_by_key(&mut self, key: &Key) -> Option<&mut AccountState> {
        let address = match self.key_lookup.find(key) {
            Some(address) => *address,
            None => public_key_to_address(key, self.network),
        };
        self.accounts.find_mut(&address)
    }

    /// Ensures an account exists at `address`.
    pub fn add_account_by_address(&mut self, address: Address, height: Height) {
        if !self.accounts.contains(&address) {
            self.accounts
                .insert(address, AccountState::new(address, height));
        }
    }

    /// Ensures an account exists for `key`, attaching the key to an account
    /// already created under its derived address.
    pub fn add_account_by_key(&mut self, key: Key, height: Height) {
        if self.key_lookup.contains(&key) {
            return;
        }

        let address = public_key_to_address(&key, self.network);
        match self.accounts.find_mut(&address) {
            Some(account) => {
                if account.public_key.is_none() {
                    account.public_key = Some(key);
                    account.public_key_height = height;
                }
            }
            None => {
                let mut account = AccountState::new(address, height);
                account.public_key = Some(key);
                account.public_key_height = height;
                self.accounts.insert(address, account);
            }
        }
        self.key_lookup.insert(key, address);
    }

    /// Removes the account at `address` and its key mapping.
    pub fn remove(&mut self, address: &Address) -> bool {
        let key = self
            .accounts
            .find(address)
            .and_then(|account| account.public_key);
        if let Some(key) = key {
            self.key_lookup.remove(&key);
        }
        self.accounts.remove(address)
    }

    /// Number of visible accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Tracked account changes.
    pub fn deltas(&self) -> DeltaElements<'_, Address, AccountState> {
        self.accounts.deltas()
    }
}

/// Read-only account access for validators.
#[derive(Clone, Copy)]
pub struct ReadOnlyAccountStateCache<'a> {
    network: NetworkIdentifier,
    accounts: &'a dyn ReadOnlySet<Address, AccountState>,
    key_lookup: &'a dyn ReadOnlySet<Key, Address>,
}

impl<'a> ReadOnlyAccountStateCache<'a> {
    pub fn network_identifier(&self) -> NetworkIdentifier {
        self.network
    }

    pub fn find_by_address(&self, address: &Address) -> Option<&'a AccountState> {
        let accounts = self.accounts;
        accounts.find(address)
    }

    pub fn find_by_key(&self, key: &Key) -> Option<&'a AccountState> {
        let (accounts, key_lookup) = (self.accounts, self.key_lookup);
        let address = key_lookup.find(key)?;
        accounts.find(address)
    }

    /// Key lookup first, then the derived address.
    pub fn resolve(&self, key: &Key) -> Option<&'a AccountState> {
        self.find_by_key(key)
            .or_else(|| self.find_by_address(&public_key_to_address(key, self.network)))
    }

    pub fn contains_address(&self, address: &Address) -> bool {
        self.accounts.contains(address)
    }
}

impl<'a> ReadOnlySubCache<'a> for ReadOnlyAccountStateCache<'a> {
    fn from_cache(cache: ReadOnlyCache<'a>) -> Self {
        match cache {
            ReadOnlyCache::Committed(view) => {
                let view = view.sub::<AccountStateCache>();
                Self {
                    network: view.network,
                    accounts: &view.accounts,
                    key_lookup: &view.key_lookup,
                }
            }
            ReadOnlyCache::Current(delta) => {
                let delta = delta.sub::<AccountStateCache>();
                Self {
                    network: delta.network,
                    accounts: &delta.accounts,
                    key_lookup: &delta.key_lookup,
                }
            }
        }
    }
}
