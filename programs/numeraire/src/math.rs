use anchor_lang::prelude::*;

use crate::errors::NumeraireError;

/// Checked arithmetic that fails with a ledger error instead of wrapping.
pub trait SafeMath: Sized {
    fn safe_add(self, rhs: Self) -> Result<Self>;
    fn safe_sub(self, rhs: Self) -> Result<Self>;
    fn safe_mul(self, rhs: Self) -> Result<Self>;
    fn safe_div(self, rhs: Self) -> Result<Self>;
}

macro_rules! impl_safe_math {
    ($($t:ty),*) => {
        $(
            impl SafeMath for $t {
                fn safe_add(self, rhs: Self) -> Result<Self> {
                    self.checked_add(rhs).ok_or_else(|| error!(NumeraireError::ArithmeticOverflow))
                }

                fn safe_sub(self, rhs: Self) -> Result<Self> {
                    self.checked_sub(rhs).ok_or_else(|| error!(NumeraireError::ArithmeticUnderflow))
                }

                fn safe_mul(self, rhs: Self) -> Result<Self> {
                    self.checked_mul(rhs).ok_or_else(|| error!(NumeraireError::ArithmeticOverflow))
                }

                fn safe_div(self, rhs: Self) -> Result<Self> {
                    require!(rhs != 0, NumeraireError::DivisionByZero);
                    self.checked_div(rhs).ok_or_else(|| error!(NumeraireError::ArithmeticOverflow))
                }
            }
        )*
    };
}

impl_safe_math!(u128, u64, i64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_fails_instead_of_wrapping() {
        assert_eq!(u128::MAX.safe_add(1).unwrap_err(), NumeraireError::ArithmeticOverflow.into());
        assert_eq!(5u128.safe_add(7).unwrap(), 12);
    }

    #[test]
    fn sub_reports_underflow() {
        assert_eq!(0u128.safe_sub(1).unwrap_err(), NumeraireError::ArithmeticUnderflow.into());
        assert_eq!(i64::MIN.safe_sub(1).unwrap_err(), NumeraireError::ArithmeticUnderflow.into());
    }

    #[test]
    fn mul_and_div() {
        assert_eq!(u64::MAX.safe_mul(2).unwrap_err(), NumeraireError::ArithmeticOverflow.into());
        assert_eq!(10u64.safe_div(0).unwrap_err(), NumeraireError::DivisionByZero.into());
        assert_eq!(21i64.safe_div(4).unwrap(), 5);
    }
}
