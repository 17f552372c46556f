pub mod probe;
pub mod tenderly;

pub use probe::{EndpointProbe, HttpProbe};
pub use tenderly::{FaucetRpc, RpcConnector, TenderlyClient, TenderlyConnector};
