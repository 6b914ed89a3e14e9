use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;

use crate::contracts::erc20::Erc20::approveCall;

/// `approve(spender, amount)` calldata
pub fn approve_calldata(spender: Address, amount: U256) -> Bytes {
    approveCall { spender, amount }.abi_encode().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_approve_round_trips_spender_and_amount() {
        let spender = address!("F06A59348712a11e7823Ad8BFc45c59f7EAFCc60");
        let amount = U256::from(10_000_000u64);

        let data = approve_calldata(spender, amount);
        let decoded = approveCall::abi_decode(&data).unwrap();

        assert_eq!(decoded.spender, spender);
        assert_eq!(decoded.amount, amount);
    }

    #[test]
    fn test_approve_is_deterministic() {
        let spender = address!("924a9f036260DdD5808007E1AA95f08eD08aA569");
        let amount = U256::from(1u64);
        assert_eq!(
            approve_calldata(spender, amount),
            approve_calldata(spender, amount)
        );
    }

    #[test]
    fn test_approve_encoding() {
        let data = approve_calldata(
            address!("924a9f036260DdD5808007E1AA95f08eD08aA569"),
            U256::from(1_000_000u64),
        );
        insta::assert_snapshot!(data.to_string(), @"0x095ea7b3000000000000000000000000924a9f036260ddd5808007e1aa95f08ed08aa56900000000000000000000000000000000000000000000000000000000000f4240");
    }
}
