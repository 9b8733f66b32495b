//! Property tests for detail normalization.
//!
//! - Normalizing already-normalized details is the identity
//! - Every string key of the input survives, last occurrence wins
//! - Odd-length input maps its trailing key to `NOVAL`

use errkit::{normalize, Value, NO_VALUE};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z ]{0,12}".prop_map(Value::from),
    ]
}

fn arb_key() -> impl Strategy<Value = Value> {
    prop_oneof![
        4 => "[a-z_]{1,8}".prop_map(Value::from),
        1 => any::<i32>().prop_map(Value::from),
        1 => any::<bool>().prop_map(Value::from),
    ]
}

fn arb_args() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(prop_oneof![arb_key(), arb_scalar()], 0..16)
}

proptest! {
    #[test]
    fn normalize_is_idempotent(args in arb_args()) {
        let once = normalize(args);
        let twice = normalize(vec![once.clone()]);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn string_keys_last_write_wins(pairs in prop::collection::vec(("[a-d]", arb_scalar()), 1..12)) {
        let args: Vec<Value> = pairs
            .iter()
            .flat_map(|(k, v)| [Value::from(k.as_str()), v.clone()])
            .collect();
        let details = normalize(args);

        for (key, _) in &pairs {
            let last = pairs.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v);
            prop_assert_eq!(details.get(key), last);
        }
        prop_assert!(details.len() <= pairs.len());
    }

    #[test]
    fn odd_length_ends_with_no_value(
        pairs in prop::collection::vec(("[a-d]", arb_scalar()), 0..6),
        last in "[x-z]",
    ) {
        let mut args: Vec<Value> = pairs
            .iter()
            .flat_map(|(k, v)| [Value::from(k.as_str()), v.clone()])
            .collect();
        args.push(Value::from(last.as_str()));

        let details = normalize(args);
        prop_assert_eq!(details.get(&last), Some(&Value::from(NO_VALUE)));
    }

    #[test]
    fn non_string_keys_become_bad_keys(key in any::<i64>(), value in arb_scalar()) {
        let details = normalize(vec![Value::from(key), value.clone()]);
        let bad_key = format!("BADKEY:({})", key);
        prop_assert_eq!(details.get(&bad_key), Some(&value));
    }
}
