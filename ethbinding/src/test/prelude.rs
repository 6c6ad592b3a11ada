//! Prelude module with common types used for unit tests.

pub use crate::test::clock::MockClock;
pub use crate::test::transport::TestTransport;
use crate::binding::ContractBinding;
use ethbinding_common::Abi;
use futures::future::FutureExt;
pub use serde_json::json;
use serde_json::Value;
use std::future::Future;
pub use web3::api::Web3;
pub use web3::types::H256;
use web3::types::{Address, H2048};

/// An extension future to wait for a future.
pub trait FutureTestExt: Future {
    /// Block thread on a future completing.
    fn wait(self) -> Self::Output;
    /// Assert that future is ready immediately and return the output.
    fn immediate(self) -> Self::Output;
}

impl<F: Future + Sized> FutureTestExt for F {
    fn wait(self) -> Self::Output {
        futures::executor::block_on(self)
    }
    fn immediate(self) -> Self::Output {
        self.now_or_never()
            .expect("future did not resolve immediately")
    }
}

/// A mined transaction receipt with the given logs.
pub fn receipt_json(hash: H256, logs: Value) -> Value {
    json!({
        "transactionHash": hash,
        "transactionIndex": "0x1",
        "blockNumber": "0x2",
        "blockHash": H256::zero(),
        "from": Address::zero(),
        "to": Address::repeat_byte(0xca),
        "cumulativeGasUsed": "0x1337",
        "gasUsed": "0x1337",
        "status": "0x1",
        "logsBloom": H2048::zero(),
        "logs": logs,
    })
}

/// A binding without events on a test transport and simulated clock.
pub fn test_binding(web3: Web3<TestTransport>) -> ContractBinding<Web3<TestTransport>, MockClock> {
    let abi: Abi = serde_json::from_str("[]").expect("empty ABI");
    ContractBinding::new(abi, web3).with_clock(MockClock::new())
}
