//! Enumerations, wide integers and `bool`

use crate::types::{MyEnum, MyEnumAsInt};
use std::os::raw::c_int;

/// `MyEnum return_enum(void);`
#[no_mangle]
pub extern "C" fn return_enum() -> MyEnum {
    MyEnum::ENUM_VAL1
}

/// `int accept_enum(MyEnum val);`
///
/// The parameter is the raw `int` the C ABI carries: a Rust `MyEnum`
/// holding an undeclared tag would already be undefined before the body
/// ran. An undeclared tag is a contract violation and aborts; it is never
/// mapped to a fallback value.
#[no_mangle]
pub extern "C" fn accept_enum(val: c_int) -> c_int {
    checked_enum_ordinal(val)
}

/// Validates a raw tag and maps it, raising on an undeclared value.
pub fn checked_enum_ordinal(val: c_int) -> c_int {
    match MyEnum::from_raw(val) {
        Ok(tag) => enum_ordinal(tag),
        Err(violation) => violation.raise("accept_enum"),
    }
}

/// Tag-to-integer mapping behind [`accept_enum`]. Exhaustive, no default arm.
pub fn enum_ordinal(tag: MyEnum) -> c_int {
    match tag {
        MyEnum::ENUM_VAL1 => 0,
        MyEnum::ENUM_VAL2 => 1,
    }
}

/// `enum MyEnumAsInt return_enum_as_int(void);`
#[no_mangle]
pub extern "C" fn return_enum_as_int() -> MyEnumAsInt {
    MyEnumAsInt::ENUM_AS_INT_VAL1
}

/// `uint64_t bigint_method(uint64_t number);`
///
/// Returns `number + 1`, wrapping at `u64::MAX`. All 64 bits survive on
/// 32-bit targets too.
#[no_mangle]
pub extern "C" fn bigint_method(number: u64) -> u64 {
    tracing::debug!(number, "bigint_method");
    number.wrapping_add(1)
}

/// `size_t size_tmethod(size_t number);`
///
/// Same check as [`bigint_method`] at the platform's address width.
#[no_mangle]
pub extern "C" fn size_tmethod(number: usize) -> usize {
    tracing::debug!(number, "size_tmethod");
    number.wrapping_add(1)
}

/// `bool returns_bool(void);`
#[no_mangle]
pub extern "C" fn returns_bool() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_return_enum_is_first_tag() {
        assert_eq!(return_enum(), MyEnum::ENUM_VAL1);
        assert_eq!(return_enum_as_int(), MyEnumAsInt::ENUM_AS_INT_VAL1);
    }

    #[rstest]
    #[case(MyEnum::ENUM_VAL1, 0)]
    #[case(MyEnum::ENUM_VAL2, 1)]
    fn test_accept_enum(#[case] tag: MyEnum, #[case] expected: c_int) {
        assert_eq!(accept_enum(tag as c_int), expected);
        assert_eq!(enum_ordinal(tag), expected);
        assert_eq!(checked_enum_ordinal(tag as c_int), expected);
    }

    #[rstest]
    #[case(2)]
    #[case(-1)]
    #[should_panic(expected = "accept_enum")]
    fn test_undeclared_tag_is_a_contract_violation(#[case] raw: c_int) {
        checked_enum_ordinal(raw);
    }

    #[rstest]
    #[case(0, 1)]
    #[case(41, 42)]
    #[case(u64::from(u32::MAX), 1 << 32)]
    #[case(u64::MAX, 0)]
    fn test_bigint_method(#[case] input: u64, #[case] expected: u64) {
        assert_eq!(bigint_method(input), expected);
    }

    #[test]
    fn test_size_tmethod_wraps() {
        assert_eq!(size_tmethod(1), 2);
        assert_eq!(size_tmethod(usize::MAX), 0);
    }

    #[test]
    fn test_returns_bool_is_false() {
        assert!(!returns_bool());
        assert_eq!(std::mem::size_of::<bool>(), 1);
    }
}
