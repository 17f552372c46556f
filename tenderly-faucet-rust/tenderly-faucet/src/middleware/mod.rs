pub mod error_handling;

pub use error_handling::{
    form_error_handler, json_error_handler, not_found, query_error_handler, ErrorResponseBuilder,
};
