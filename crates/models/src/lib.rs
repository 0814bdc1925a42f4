//! sea-orm entities of the maintenance system, with the field rules each table enforces.

pub mod errors;
pub mod db;
pub mod user;
pub mod user_credentials;
pub mod equipment;
pub mod maintenance_plan;
pub mod work_order;
pub mod document;
pub mod notification;
pub mod audit_log;

#[cfg(test)]
mod tests;
