pub mod uniswap_pool;

pub use uniswap_pool::UniswapV3Pool;
