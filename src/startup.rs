use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::configuration::DatabaseConfigs;

pub fn get_connection_pool(config: &DatabaseConfigs) -> PgPool {
    PgPoolOptions::new().connect_lazy_with(config.connect_options())
}
