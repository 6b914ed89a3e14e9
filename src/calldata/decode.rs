use alloy_dyn_abi::{DynSolValue, JsonAbiExt};
use alloy_json_abi::Function;
use alloy_primitives::hex;

use crate::{ActionsError, Result};

/// Decodes `data` against a human-readable function signature such as
/// `function approve(address spender, uint256 value)`.
///
/// The leading 4-byte selector must match the signature.
pub fn decode_with_signature(signature: &str, data: &[u8]) -> Result<Vec<DynSolValue>> {
    let function = Function::parse(signature)
        .map_err(|e| ActionsError::InvalidConfig(format!("unparseable signature: {e}")))?;

    let selector = function.selector();
    match data.get(..4) {
        Some(prefix) if prefix == selector.as_slice() => {}
        _ => {
            return Err(ActionsError::InvalidConfig(format!(
                "calldata does not start with selector {} of {}",
                hex::encode_prefixed(selector),
                function.signature()
            )));
        }
    }

    Ok(function.abi_decode_input(&data[4..])?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calldata::approve_calldata;
    use alloy_primitives::{address, Address, U256};

    #[test]
    fn test_decode_approve() {
        let spender = address!("924a9f036260DdD5808007E1AA95f08eD08aA569");
        let data = approve_calldata(spender, U256::from(42u64));

        let values =
            decode_with_signature("function approve(address spender, uint256 value)", &data)
                .unwrap();

        assert_eq!(values.len(), 2);
        assert_eq!(values[0].as_address(), Some(spender));
        assert_eq!(values[1].as_uint(), Some((U256::from(42u64), 256)));
    }

    #[test]
    fn test_decode_rejects_selector_mismatch() {
        let data = approve_calldata(Address::ZERO, U256::ZERO);
        let result = decode_with_signature("function transfer(address to, uint256 value)", &data);
        assert!(matches!(result, Err(ActionsError::InvalidConfig(_))));
    }

    #[test]
    fn test_decode_rejects_short_data() {
        let result = decode_with_signature("approve(address,uint256)", &[0x09, 0x5e]);
        assert!(matches!(result, Err(ActionsError::InvalidConfig(_))));
    }
}
