use alloy::primitives::{Address, U256};

/// Reserves of a two-token constant-product pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolReserves {
    pool: Address,
    token0: Address,
    token1: Address,
    reserve0: U256,
    reserve1: U256,
}

impl PoolReserves {
    pub fn new(
        pool: Address,
        token0: Address,
        token1: Address,
        reserve0: U256,
        reserve1: U256,
    ) -> Self {
        Self {
            pool,
            token0,
            token1,
            reserve0,
            reserve1,
        }
    }

    pub fn pool(&self) -> Address {
        self.pool
    }

    pub fn token0(&self) -> Address {
        self.token0
    }

    pub fn token1(&self) -> Address {
        self.token1
    }

    pub fn reserve0(&self) -> U256 {
        self.reserve0
    }

    pub fn reserve1(&self) -> U256 {
        self.reserve1
    }

    /// Raw reserve of `token`, `None` if the pool does not hold it.
    pub fn reserve_of(&self, token: Address) -> Option<U256> {
        if token == self.token0 {
            Some(self.reserve0)
        } else if token == self.token1 {
            Some(self.reserve1)
        } else {
            None
        }
    }
}
