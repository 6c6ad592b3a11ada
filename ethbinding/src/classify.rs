//! Runtime classification of dynamically typed contract call arguments.
//!
//! Generated bindings accept positional arguments as JSON values with an
//! optional trailing transaction options object. These checks decide whether
//! that trailing value is options or ordinary call data.

use crate::number::BigNumber;
use serde::Deserialize;
use serde_json::Value;

/// Returns true if the value is a key-value object. Arrays are not objects.
pub fn is_plain_object(value: &Value) -> bool {
    value.is_object()
}

/// Returns true if the value is an object that can be constructed into a
/// [`BigNumber`].
///
/// This is a capability check rather than a type check: any object shape
/// that big number construction accepts qualifies, regardless of which
/// library produced it. Plain strings and numbers are not structured and are
/// never considered big number objects.
pub fn is_big_number_like(value: &Value) -> bool {
    value.is_object() && BigNumber::deserialize(value).is_ok()
}

/// Returns true if the value should be treated as transaction options when
/// it is the last argument of a call.
pub fn is_transaction_options(value: &Value) -> bool {
    is_plain_object(value) && !is_big_number_like(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_objects() {
        assert!(is_plain_object(&json!({})));
        assert!(is_plain_object(&json!({ "from": "0x00" })));
        assert!(!is_plain_object(&json!([])));
        assert!(!is_plain_object(&json!("0x00")));
        assert!(!is_plain_object(&json!(1)));
        assert!(!is_plain_object(&json!(null)));
    }

    #[test]
    fn big_number_objects() {
        assert!(is_big_number_like(&json!({ "_hex": "0x01", "_isBigNumber": true })));
        assert!(is_big_number_like(&json!({ "type": "BigNumber", "hex": "0xff" })));
        assert!(is_big_number_like(&json!({ "hex": "-12" })));

        assert!(!is_big_number_like(&json!({ "gas": 100 })));
        assert!(!is_big_number_like(&json!({ "hex": "not a number" })));
        assert!(!is_big_number_like(&json!(["0x01"])));
        assert!(!is_big_number_like(&json!("0x01")));
        assert!(!is_big_number_like(&json!(1)));
        assert!(!is_big_number_like(&json!(true)));
    }

    #[test]
    fn transaction_options() {
        assert!(is_transaction_options(&json!({ "value": "0x10" })));
        assert!(is_transaction_options(&json!({})));
        assert!(!is_transaction_options(&json!({ "_hex": "0x10" })));
        assert!(!is_transaction_options(&json!([{}])));
    }
}
