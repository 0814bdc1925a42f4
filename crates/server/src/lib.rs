pub mod actor;
pub mod errors;
pub mod openapi;
pub mod routes;
pub mod scheduler;
pub mod startup;
pub mod state;

pub use startup::run;
