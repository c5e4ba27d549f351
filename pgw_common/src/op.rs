/// Implements an overflow-checked binary operation on a single-field integer newtype.
///
/// `op!(checked MinorUnits, checked_add, MinorUnitsConversionError)` generates
/// `MinorUnits::checked_add(self, rhs: Self) -> Result<Self, MinorUnitsConversionError>`. The error type must be a
/// tuple struct over a `String` that is constructible where the macro is invoked.
#[macro_export]
macro_rules! op {
    (checked $for_struct:ident, $impl_fn:ident, $err:ident) => {
        impl $for_struct {
            pub fn $impl_fn(self, rhs: Self) -> Result<Self, $err> {
                self.0
                    .$impl_fn(rhs.0)
                    .map(Self)
                    .ok_or_else(|| $err(format!("{} {} {} overflows", self, stringify!($impl_fn), rhs)))
            }
        }
    };
}
