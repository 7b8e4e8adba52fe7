//! Composition root: the only place that names the concrete outbound adapters.

use std::sync::Arc;

use adventure_core::GridOffset;
use sqlx::PgPool;

use crate::{
    adapters::outbound::postgres::{PostgresCategoryRepository, PostgresTimeEntryRepository},
    domain::{ports::inbound::GridService, services::GridServiceImpl},
};

/// Build the grid service on top of PostgreSQL.
pub fn grid_service(pool: PgPool, offset: GridOffset) -> Arc<dyn GridService> {
    let entries = PostgresTimeEntryRepository::new(pool.clone());
    let categories = PostgresCategoryRepository::new(pool);

    Arc::new(GridServiceImpl::new(
        Arc::new(entries),
        Arc::new(categories),
        offset,
    ))
}
