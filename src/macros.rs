/// Builds a [`NativeValue`](crate::NativeValue) from a JSON-like literal.
///
/// ```rust
/// use serde_gbln::{gbln, NativeValue};
///
/// let user = gbln!({
///     "name": "Alice",
///     "age": 30,
///     "tags": ["admin", "ops"],
///     "manager": null
/// });
/// assert_eq!(user.get("age"), Some(NativeValue::from(30)));
/// ```
///
/// Negative numbers and other multi-token expressions inside arrays or
/// objects need parentheses: `gbln!([(-1), 2])`.
///
/// Any other expression must convert losslessly with
/// `NativeValue::from`, so a value GBLN cannot hold is a compile error
/// rather than a silent null:
///
/// ```compile_fail
/// let too_wide = serde_gbln::gbln!(u128::MAX);
/// ```
///
/// Arbitrary `Serialize` values go through [`to_native`](crate::to_native),
/// which reports what it cannot represent:
///
/// ```rust
/// assert!(serde_gbln::to_native(&u128::MAX).is_err());
/// assert_eq!(
///     serde_gbln::to_native(&(u64::MAX as u128)).unwrap(),
///     serde_gbln::gbln!(u64::MAX)
/// );
/// ```
#[macro_export]
macro_rules! gbln {
    (null) => {
        $crate::NativeValue::Null
    };

    (true) => {
        $crate::NativeValue::Bool(true)
    };

    (false) => {
        $crate::NativeValue::Bool(false)
    };

    ([]) => {
        $crate::NativeValue::array(::std::vec::Vec::new())
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::NativeValue::array(::std::vec![$($crate::gbln!($elem)),*])
    };

    ({}) => {
        $crate::NativeValue::from($crate::NativeMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::NativeMap::new();
        $(
            object.insert($key.to_string(), $crate::gbln!($value));
        )*
        $crate::NativeValue::from(object)
    }};

    ($other:expr) => {
        $crate::NativeValue::from($other)
    };
}
