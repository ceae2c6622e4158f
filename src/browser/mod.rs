pub mod provider;
pub mod session;
pub mod static_provider;
