//! Aave V3 pool and Chi protocol calldata

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};

sol!(
    #[allow(missing_docs)]
    interface IAavePool {
        function supply(address asset, uint256 amount, address onBehalfOf, uint16 referralCode) external;
    }
);

sol!(
    #[allow(missing_docs)]
    interface IChiMinter {
        function mintWithWETH(uint256 wethAmount, address receiver) external;
    }
);

/// Aave `supply(asset, amount, onBehalfOf, referralCode)`
pub fn supply_calldata(
    asset: Address,
    amount: U256,
    on_behalf_of: Address,
    referral_code: u16,
) -> Bytes {
    IAavePool::supplyCall {
        asset,
        amount,
        onBehalfOf: on_behalf_of,
        referralCode: referral_code,
    }
    .abi_encode()
    .into()
}

/// Chi `mintWithWETH(wethAmount, receiver)`
pub fn mint_with_weth_calldata(weth_amount: U256, receiver: Address) -> Bytes {
    IChiMinter::mintWithWETHCall {
        wethAmount: weth_amount,
        receiver,
    }
    .abi_encode()
    .into()
}
