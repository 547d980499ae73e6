pub mod handlers;
pub mod routes;
pub mod static_files;
