/// Keeps the items only when the `std` feature is enabled.
#[macro_export]
#[doc(hidden)]
macro_rules! cfg_std {
    ($($item:item)*) => {
        $(
            #[cfg(feature = "std")]
            #[cfg_attr(docsrs, doc(cfg(feature = "std")))]
            $item
        )*
    }
}

/// Keeps the items only when the `std` feature is disabled.
#[macro_export]
#[doc(hidden)]
macro_rules! cfg_not_std {
    ($($item:item)*) => {
        $(
            #[cfg(not(feature = "std"))]
            #[cfg_attr(docsrs, doc(cfg(not(feature = "std"))))]
            $item
        )*
    }
}

/// Asserts an internal invariant in debug builds. Compiled out in release.
#[macro_export]
#[doc(hidden)]
macro_rules! check {
    ($cond:expr $(,)?) => {
        debug_assert!($cond, "check failed: {}", stringify!($cond))
    };
    ($cond:expr, $msg:literal $(,)?) => {
        debug_assert!($cond, concat!("check failed: ", $msg))
    };
}

/// Returns early with `Err($err)` when `$cond` does not hold.
#[macro_export]
#[doc(hidden)]
macro_rules! check_with {
    ($cond:expr, $err:expr $(,)?) => {
        if !($cond) {
            return core::result::Result::Err($err);
        }
    };
}
