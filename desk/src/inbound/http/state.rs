//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain use-cases and remain testable without I/O.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::ports::{InMemoryResourceApi, ResourceApi};
use crate::domain::{Error, ResourceCatalog, ResourceSchema, ResourceTableService};

/// Dependency bundle for HTTP handlers: the served resources and one table
/// service per resource.
#[derive(Clone)]
pub struct HttpState {
    catalog: Arc<ResourceCatalog>,
    tables: HashMap<&'static str, ResourceTableService>,
}

impl HttpState {
    /// Bind every resource in `catalog` to the API client `api_for` returns.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use hotel_desk::domain::ResourceCatalog;
    /// use hotel_desk::domain::ports::InMemoryResourceApi;
    /// use hotel_desk::inbound::http::state::HttpState;
    ///
    /// let catalog = ResourceCatalog::builtin().expect("valid catalog");
    /// let state = HttpState::try_new(catalog, |_| {
    ///     Ok::<_, std::convert::Infallible>(Arc::new(InMemoryResourceApi::default()))
    /// })
    /// .expect("state");
    /// assert!(state.table("empleados").is_ok());
    /// ```
    ///
    /// # Errors
    /// Propagates the first error returned by `api_for`.
    pub fn try_new<F, E>(catalog: ResourceCatalog, mut api_for: F) -> Result<Self, E>
    where
        F: FnMut(&ResourceSchema) -> Result<Arc<dyn ResourceApi>, E>,
    {
        let mut tables = HashMap::new();
        for schema in catalog.iter() {
            let api = api_for(schema)?;
            tables.insert(
                schema.slug(),
                ResourceTableService::new(Arc::new(schema.clone()), api),
            );
        }
        Ok(Self {
            catalog: Arc::new(catalog),
            tables,
        })
    }

    /// Serve every resource from its own empty in-memory store.
    #[must_use]
    pub fn in_memory(catalog: ResourceCatalog) -> Self {
        let tables = catalog
            .iter()
            .map(|schema| {
                let api: Arc<dyn ResourceApi> = Arc::new(InMemoryResourceApi::default());
                (
                    schema.slug(),
                    ResourceTableService::new(Arc::new(schema.clone()), api),
                )
            })
            .collect();
        Self {
            catalog: Arc::new(catalog),
            tables,
        }
    }

    /// Resources served, in navigation order.
    #[must_use]
    pub fn catalog(&self) -> &ResourceCatalog {
        &self.catalog
    }

    /// Table service for `slug`.
    ///
    /// # Errors
    /// Returns a not-found error for unknown resources.
    pub fn table(&self, slug: &str) -> Result<&ResourceTableService, Error> {
        self.tables
            .get(slug)
            .ok_or_else(|| Error::not_found(format!("recurso desconocido: {slug}")))
    }
}
