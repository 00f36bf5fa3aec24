use repository_base::datastore::{Context, DatastoreRepository, FilterOp, KeyValueService, Query};
use repository_base::{Repository, RepositoryError};

use super::account::Account;

/// Account-specific repository holding a generic one and forwarding to it.
pub struct AccountRepository<S> {
    inner: DatastoreRepository<Account, S>,
}

impl<S: KeyValueService> AccountRepository<S> {
    pub fn new(ctx: Context, service: S) -> Result<Self, RepositoryError> {
        Ok(Self {
            inner: DatastoreRepository::new(ctx, service)?,
        })
    }

    pub fn find(&self, number: i64) -> Result<Account, RepositoryError> {
        self.inner.find(&number)
    }

    pub fn find_all(&self) -> Result<Vec<Account>, RepositoryError> {
        self.inner.find_all()
    }

    pub fn open(&mut self, account: &mut Account) -> Result<(), RepositoryError> {
        account.active = true;
        self.inner.create(account)
    }

    pub fn save(&mut self, account: &Account) -> Result<(), RepositoryError> {
        self.inner.update(account)
    }

    pub fn close(&mut self, account: &mut Account) -> Result<(), RepositoryError> {
        account.active = false;
        self.inner.update(account)
    }

    pub fn remove(&mut self, account: &Account) -> Result<(), RepositoryError> {
        self.inner.delete(account)
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepositoryError> {
        let query = Query::new().filter("email", FilterOp::Eq, email).limit(1);
        Ok(self.inner.find_by_query(query)?.into_iter().next())
    }

    pub fn active(&self) -> Result<Vec<Account>, RepositoryError> {
        self.inner
            .find_by_query(Query::new().filter("active", FilterOp::Eq, true))
    }
}
