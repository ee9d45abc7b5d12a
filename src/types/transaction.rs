//! Transaction payload sent to the node.

use alloy::{
    primitives::{Address, Bytes},
    rpc::types::TransactionRequest,
};

/// A transaction as this crate submits it: the node signs with the sender account.
///
/// Built once through [`EthTransaction::builder`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthTransaction {
    from: Address,
    to: Option<Address>,
    data: Bytes,
    gas: Option<u64>,
    gas_price: Option<u128>,
}

impl EthTransaction {
    /// Start building a transaction sent from `from`.
    pub fn builder(from: Address) -> EthTransactionBuilder {
        EthTransactionBuilder { from, to: None, data: Bytes::new(), gas: None, gas_price: None }
    }

    /// Sender account.
    pub fn from(&self) -> Address {
        self.from
    }

    /// Recipient, `None` for contract creation.
    pub fn to(&self) -> Option<Address> {
        self.to
    }

    /// Calldata or creation bytecode.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Gas limit, if attached.
    pub fn gas(&self) -> Option<u64> {
        self.gas
    }

    /// Gas price in wei, if attached.
    pub fn gas_price(&self) -> Option<u128> {
        self.gas_price
    }

    /// Whether this transaction creates a contract.
    pub fn is_create(&self) -> bool {
        self.to.is_none()
    }

    /// Reopen the builder with every field of this transaction.
    pub fn to_builder(&self) -> EthTransactionBuilder {
        EthTransactionBuilder {
            from: self.from,
            to: self.to,
            data: self.data.clone(),
            gas: self.gas,
            gas_price: self.gas_price,
        }
    }

    /// Convert into the alloy request type used by the provider.
    pub fn to_request(&self) -> TransactionRequest {
        let mut request = TransactionRequest::default().from(self.from).input(self.data.clone().into());

        if let Some(to) = self.to {
            request = request.to(to);
        }
        if let Some(gas) = self.gas {
            request = request.gas_limit(gas);
        }
        if let Some(gas_price) = self.gas_price {
            request = request.gas_price(gas_price);
        }

        request
    }
}

/// Accumulates transaction fields before [`EthTransactionBuilder::build`].
#[derive(Debug, Clone)]
pub struct EthTransactionBuilder {
    from: Address,
    to: Option<Address>,
    data: Bytes,
    gas: Option<u64>,
    gas_price: Option<u128>,
}

impl EthTransactionBuilder {
    pub fn to(mut self, to: Address) -> Self {
        self.to = Some(to);
        self
    }

    pub fn data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = data.into();
        self
    }

    pub fn gas(mut self, gas: u64) -> Self {
        self.gas = Some(gas);
        self
    }

    pub fn gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = Some(gas_price);
        self
    }

    pub fn build(self) -> EthTransaction {
        EthTransaction {
            from: self.from,
            to: self.to,
            data: self.data,
            gas: self.gas,
            gas_price: self.gas_price,
        }
    }
}
