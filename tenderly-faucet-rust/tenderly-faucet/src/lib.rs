pub mod api;
pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod middleware;
pub mod utils;
pub mod validators;

#[cfg(test)]
pub(crate) mod test_support;
