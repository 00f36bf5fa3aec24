//! A shape-specific repository composed from the generic durable one.

mod account;
mod account_repository;

use account::Account;
use account_repository::AccountRepository;
use repository_base::datastore::{Context, Key, KeyValueService, MemoryKeyValueService};
use repository_base::{IdManager, Identifier, RepositoryError};
use serde_json::Value;

fn accounts(kv: &MemoryKeyValueService) -> AccountRepository<MemoryKeyValueService> {
    AccountRepository::new(Context::background(), kv.clone()).unwrap()
}

#[test]
fn hand_written_entity_resolves_identifier() {
    let ids = IdManager::<Account>::new().unwrap();
    assert_eq!(ids.kind(), "Account");
    assert_eq!(ids.id_field(), "account_id");

    let mut account = Account::new("a@example.com");
    ids.set_identifier(&mut account, Identifier::Int(12)).unwrap();
    assert_eq!(account.number(), 12);
    assert_eq!(ids.identifier(&account), Identifier::Int(12));
}

#[test]
fn open_find_and_close() {
    let kv = MemoryKeyValueService::new();
    let mut repo = accounts(&kv);

    let mut account = Account::new("ann@example.com");
    repo.open(&mut account).unwrap();
    assert_ne!(account.number(), 0);

    let record = kv
        .get(&Context::background(), &Key::new("Account", account.number()))
        .unwrap()
        .unwrap();
    assert_eq!(record.get("account_id"), Some(&Value::from(account.number())));

    repo.close(&mut account).unwrap();
    assert!(!repo.find(account.number()).unwrap().active);
}

#[test]
fn shape_specific_queries() {
    let kv = MemoryKeyValueService::new();
    let mut repo = accounts(&kv);

    let mut ann = Account::new("ann@example.com");
    let mut bob = Account::new("bob@example.com");
    repo.open(&mut ann).unwrap();
    repo.open(&mut bob).unwrap();
    repo.close(&mut bob).unwrap();

    assert_eq!(repo.find_by_email("bob@example.com").unwrap(), Some(bob.clone()));
    assert_eq!(repo.find_by_email("nobody@example.com").unwrap(), None);
    assert_eq!(repo.active().unwrap(), vec![ann.clone()]);
    assert_eq!(repo.find_all().unwrap().len(), 2);

    ann.email = "ann@example.org".into();
    repo.save(&ann).unwrap();
    assert_eq!(repo.find_by_email("ann@example.org").unwrap(), Some(ann));
}

#[test]
fn remove_then_find_is_not_found() {
    let kv = MemoryKeyValueService::new();
    let mut repo = accounts(&kv);
    let mut account = Account::new("gone@example.com");
    repo.open(&mut account).unwrap();

    repo.remove(&account).unwrap();
    assert!(matches!(
        repo.find(account.number()),
        Err(RepositoryError::NotFound { .. })
    ));
    assert!(kv.is_empty());
}
