pub mod fund_validator;
pub mod rpc_validator;

pub use fund_validator::{validate_fund_request, FundRequest, FundTarget, ValidatedFund};
pub use rpc_validator::{extract_error_message, RpcValidator};
