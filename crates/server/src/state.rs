use sea_orm::DatabaseConnection;

/// Shared handler state; the connection is a cheaply clonable pool handle.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
}
