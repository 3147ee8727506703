use reqwest::Url;

/// Gas consumed by a plain native-token transfer.
pub const TRANSFER_GAS_LIMIT: u64 = 21_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub name: String,
    pub rpc_endpoint: Url,
    pub gas_limit: u64,
}

impl Chain {
    pub fn new(name: impl Into<String>, rpc_endpoint: Url) -> Self {
        Self {
            name: name.into(),
            rpc_endpoint,
            gas_limit: TRANSFER_GAS_LIMIT,
        }
    }
}
