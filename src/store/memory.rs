//! In-process store. Used by tests and by `CUSTOMER_STORE=memory` runs.

use super::{CustomerStore, StoreError};
use crate::model::{Customer, CustomerId, CustomerPatch};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryCustomerStore {
    records: RwLock<HashMap<CustomerId, Customer>>,
}

impl MemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn member_number_taken(
    records: &HashMap<CustomerId, Customer>,
    member_number: i64,
    except: Option<&CustomerId>,
) -> bool {
    records
        .values()
        .any(|c| c.member_number == member_number && Some(&c.id) != except)
}

#[async_trait]
impl CustomerStore for MemoryCustomerStore {
    async fn list(&self) -> Result<Vec<Customer>, StoreError> {
        let records = self.records.read().await;
        let mut out: Vec<Customer> = records.values().cloned().collect();
        out.sort_by_key(|c| c.member_number);
        Ok(out)
    }

    async fn insert(&self, customer: Customer) -> Result<Customer, StoreError> {
        let mut records = self.records.write().await;
        if member_number_taken(&records, customer.member_number, None) {
            return Err(StoreError::DuplicateKey);
        }
        if records.contains_key(&customer.id) {
            return Err(StoreError::IdConflict(customer.id.to_string()));
        }
        records.insert(customer.id.clone(), customer.clone());
        Ok(customer)
    }

    async fn find(&self, id: &CustomerId) -> Result<Option<Customer>, StoreError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn update(
        &self,
        id: &CustomerId,
        patch: &CustomerPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Customer>, StoreError> {
        let mut records = self.records.write().await;
        if !records.contains_key(id) {
            return Ok(None);
        }
        if let Some(n) = patch.member_number {
            if member_number_taken(&records, n, Some(id)) {
                return Err(StoreError::DuplicateKey);
            }
        }
        Ok(records.get_mut(id).map(|c| {
            c.apply(patch, now);
            c.clone()
        }))
    }

    async fn delete(&self, id: &CustomerId) -> Result<Option<Customer>, StoreError> {
        Ok(self.records.write().await.remove(id))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewCustomer;
    use chrono::NaiveDate;

    fn customer(member_number: i64) -> Customer {
        Customer::new(
            CustomerId::generate(),
            NewCustomer {
                name: format!("member {}", member_number),
                date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).expect("date"),
                member_number,
                interests: None,
            },
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn list_is_sorted_by_member_number() {
        let store = MemoryCustomerStore::new();
        for n in [30, 10, 20] {
            store.insert(customer(n)).await.expect("insert");
        }
        let numbers: Vec<i64> = store
            .list()
            .await
            .expect("list")
            .iter()
            .map(|c| c.member_number)
            .collect();
        assert_eq!(numbers, vec![10, 20, 30]);
    }

    #[tokio::test]
    async fn duplicate_insert_leaves_original_untouched() {
        let store = MemoryCustomerStore::new();
        let first = store.insert(customer(1)).await.expect("insert");
        let err = store.insert(customer(1)).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey));
        let all = store.list().await.expect("list");
        assert_eq!(all, vec![first]);
    }

    #[tokio::test]
    async fn reused_id_is_an_id_conflict_not_a_duplicate_member_number() {
        let store = MemoryCustomerStore::new();
        let first = store.insert(customer(1)).await.expect("insert");
        let mut clash = customer(2);
        clash.id = first.id.clone();
        let err = store.insert(clash).await.unwrap_err();
        assert!(matches!(err, StoreError::IdConflict(ref id) if id == first.id.as_str()));
        assert_eq!(store.list().await.expect("list"), vec![first]);
    }

    #[tokio::test]
    async fn update_rejects_member_number_of_another_record() {
        let store = MemoryCustomerStore::new();
        let a = store.insert(customer(1)).await.expect("insert");
        store.insert(customer(2)).await.expect("insert");
        let patch = CustomerPatch {
            member_number: Some(2),
            ..Default::default()
        };
        let err = store.update(&a.id, &patch, Utc::now()).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey));
        let unchanged = store.find(&a.id).await.expect("find").expect("present");
        assert_eq!(unchanged.member_number, 1);
    }

    #[tokio::test]
    async fn update_may_keep_its_own_member_number() {
        let store = MemoryCustomerStore::new();
        let a = store.insert(customer(1)).await.expect("insert");
        let patch = CustomerPatch {
            member_number: Some(1),
            name: Some("renamed".into()),
            ..Default::default()
        };
        let updated = store
            .update(&a.id, &patch, Utc::now())
            .await
            .expect("update")
            .expect("present");
        assert_eq!(updated.name, "renamed");
    }

    #[tokio::test]
    async fn missing_ids_resolve_to_none() {
        let store = MemoryCustomerStore::new();
        let id = CustomerId::from("nope");
        assert!(store.find(&id).await.expect("find").is_none());
        assert!(store
            .update(&id, &CustomerPatch::default(), Utc::now())
            .await
            .expect("update")
            .is_none());
        assert!(store.delete(&id).await.expect("delete").is_none());
    }
}
