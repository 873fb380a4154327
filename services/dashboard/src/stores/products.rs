//! services/dashboard/src/stores/products.rs
//!
//! The products store: list, create, update and delete against `/products`.

use admin_dashboard_core::domain::{Product, ProductDraft};
use admin_dashboard_core::ports::{AdminApi, PortResult};
use admin_dashboard_core::resource::{RequestKind, ResourceAction, ResourceState};
use admin_dashboard_core::validation::validate_product;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, instrument};

use crate::notify::Notifier;
use crate::stores::auth::AuthStore;
use crate::stores::resource::ResourceStore;

const FETCH_FAILED: &str = "Failed to fetch products";
const CREATE_FAILED: &str = "Failed to add product";
const UPDATE_FAILED: &str = "Failed to update product";
const DELETE_FAILED: &str = "Failed to delete product";

#[derive(Clone)]
pub struct ProductsStore {
    inner: ResourceStore<Product>,
    api: Arc<dyn AdminApi>,
}

impl ProductsStore {
    pub fn new(api: Arc<dyn AdminApi>, session: AuthStore, notifier: Notifier) -> Self {
        Self {
            inner: ResourceStore::new(session, notifier),
            api,
        }
    }

    pub fn state(&self) -> ResourceState<Product> {
        self.inner.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<ResourceState<Product>> {
        self.inner.subscribe()
    }

    pub fn cancel_pending(&self) {
        self.inner.cancel_pending();
    }

    #[instrument(skip(self))]
    pub async fn fetch_all(&self) -> PortResult<Vec<Product>> {
        let products = self
            .inner
            .execute(
                RequestKind::Fetch,
                FETCH_FAILED,
                self.api.list_products(),
                |seq, items: &Vec<Product>| ResourceAction::Fetched(seq, items.clone()),
            )
            .await?;
        info!(count = products.len(), "Products loaded");
        Ok(products)
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create(&self, draft: &ProductDraft) -> PortResult<Product> {
        if let Err(errors) = validate_product(draft) {
            debug!(fields = errors.len(), "Product rejected by local validation");
            return Err(errors.into());
        }
        let product = self
            .inner
            .execute(
                RequestKind::Mutation,
                CREATE_FAILED,
                self.api.create_product(draft),
                |seq, product: &Product| ResourceAction::Created(seq, product.clone()),
            )
            .await?;
        info!(id = %product.id, "Product created");
        self.inner.notifier().success("Product created successfully");
        Ok(product)
    }

    #[instrument(skip(self, draft))]
    pub async fn update(&self, id: &str, draft: &ProductDraft) -> PortResult<Product> {
        if let Err(errors) = validate_product(draft) {
            debug!(fields = errors.len(), "Product rejected by local validation");
            return Err(errors.into());
        }
        let product = self
            .inner
            .execute(
                RequestKind::Mutation,
                UPDATE_FAILED,
                self.api.update_product(id, draft),
                |seq, product: &Product| ResourceAction::Updated(seq, product.clone()),
            )
            .await?;
        info!("Product updated");
        self.inner.notifier().success("Product updated successfully");
        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> PortResult<()> {
        self.inner
            .execute(
                RequestKind::Mutation,
                DELETE_FAILED,
                self.api.delete_product(id),
                |seq, _: &()| ResourceAction::Deleted(seq, id.to_string()),
            )
            .await?;
        info!("Product deleted");
        self.inner.notifier().success("Product deleted successfully");
        Ok(())
    }

    pub fn select(&self, id: &str) -> Option<Product> {
        self.inner.select(&id.to_string())
    }

    pub fn clear_selection(&self) {
        self.inner.clear_selection();
    }
}
