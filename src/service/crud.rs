//! Customer CRUD over a [`CustomerStore`]: validation, server-assigned fields, error shaping.

use crate::error::AppError;
use crate::model::{Customer, CustomerId};
use crate::service::CustomerValidator;
use crate::store::CustomerStore;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct CustomerService {
    store: Arc<dyn CustomerStore>,
}

impl CustomerService {
    pub fn new(store: Arc<dyn CustomerStore>) -> Self {
        CustomerService { store }
    }

    pub fn store(&self) -> &Arc<dyn CustomerStore> {
        &self.store
    }

    /// All customers, ascending by member number.
    pub async fn list(&self) -> Result<Vec<Customer>, AppError> {
        self.store
            .list()
            .await
            .map_err(|e| AppError::store("Failed to fetch customers", e))
    }

    /// Validate the body and insert a new record with a fresh id and timestamps.
    pub async fn create(&self, body: &Value) -> Result<Customer, AppError> {
        let input = CustomerValidator::validate_new(body)?;
        let customer = Customer::new(CustomerId::generate(), input, Utc::now());
        let member_number = customer.member_number;
        let created = self.store.insert(customer).await.map_err(|e| {
            let err = AppError::store("Failed to create customer", e);
            if matches!(err, AppError::DuplicateMemberNumber) {
                tracing::warn!(member_number, "create rejected: member number already exists");
            }
            err
        })?;
        tracing::info!(id = %created.id, member_number, "customer created");
        Ok(created)
    }

    pub async fn get(&self, id: &CustomerId) -> Result<Customer, AppError> {
        self.store
            .find(id)
            .await
            .map_err(|e| AppError::store("Failed to fetch customer", e))?
            .ok_or(AppError::NotFound)
    }

    /// Apply the supplied fields. Omitted fields stay untouched; see [`CustomerValidator::validate_patch`].
    pub async fn update(&self, id: &CustomerId, body: &Value) -> Result<Customer, AppError> {
        let patch = CustomerValidator::validate_patch(body)?;
        let updated = self
            .store
            .update(id, &patch, Utc::now())
            .await
            .map_err(|e| {
                let err = AppError::store("Failed to update customer", e);
                if matches!(err, AppError::DuplicateMemberNumber) {
                    tracing::warn!(id = %id, member_number = ?patch.member_number, "update rejected: member number already exists");
                }
                err
            })?
            .ok_or(AppError::NotFound)?;
        tracing::info!(id = %id, "customer updated");
        Ok(updated)
    }

    /// Remove the record and return what was deleted.
    pub async fn delete(&self, id: &CustomerId) -> Result<Customer, AppError> {
        let deleted = self
            .store
            .delete(id)
            .await
            .map_err(|e| AppError::store("Failed to delete customer", e))?
            .ok_or(AppError::NotFound)?;
        tracing::info!(id = %id, member_number = deleted.member_number, "customer deleted");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryCustomerStore;
    use serde_json::json;

    fn service() -> CustomerService {
        CustomerService::new(Arc::new(MemoryCustomerStore::new()))
    }

    #[tokio::test]
    async fn create_assigns_server_fields() {
        let svc = service();
        let c = svc
            .create(&json!({"name": "Ann", "dateOfBirth": "1990-05-01", "memberNumber": 1}))
            .await
            .expect("create");
        assert!(!c.id.as_str().is_empty());
        assert_eq!(c.created_at, c.updated_at);
    }

    #[tokio::test]
    async fn create_surfaces_validation_before_touching_store() {
        let svc = service();
        let err = svc.create(&json!({"name": "Ann"})).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(svc.list().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn duplicate_member_number_is_distinct_error() {
        let svc = service();
        let body = json!({"name": "Ann", "dateOfBirth": "1990-05-01", "memberNumber": 1});
        svc.create(&body).await.expect("first");
        let err = svc.create(&body).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateMemberNumber));
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let svc = service();
        let id = CustomerId::from("missing");
        assert!(matches!(svc.get(&id).await, Err(AppError::NotFound)));
        assert!(matches!(
            svc.update(&id, &json!({"name": "x"})).await,
            Err(AppError::NotFound)
        ));
        assert!(matches!(svc.delete(&id).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn invalid_patch_is_rejected_even_for_unknown_id() {
        let svc = service();
        let err = svc
            .update(&CustomerId::from("missing"), &json!({"memberNumber": "abc"}))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
