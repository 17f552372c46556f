pub mod flash;
pub mod sanitizer;
