//! Amount allocation using the Largest Remainder Method.
//!
//! Both functions guarantee that no minor unit is lost or gained:
//! - `distribute` splits an amount into N near-equal parts.
//! - `allocate` splits an amount by decimal weights (fractions, shares).
//!
//! The Largest Remainder Method works by:
//! 1. Calculate exact allocations
//! 2. Round each allocation
//! 3. Calculate the residual (target - sum of rounded)
//! 4. Hand out residual units to the items whose rounding moved them
//!    furthest from their exact value

use rust_decimal::Decimal;

use super::money::{Amount, AmountError};

impl Amount {
    /// Splits the amount into `parts` amounts whose sum is exactly `self`.
    ///
    /// Each part is the truncated quotient; the first `|remainder|` parts
    /// receive one extra minor unit carrying the amount's sign.
    ///
    /// # Example
    ///
    /// ```
    /// use hauptbuch_shared::types::{Amount, Currency};
    ///
    /// let total = Amount::parse("100.00", Currency::Eur).unwrap();
    /// let parts: Vec<String> = total.distribute(3).unwrap().iter().map(ToString::to_string).collect();
    /// assert_eq!(parts, ["33.34", "33.33", "33.33"]);
    /// ```
    pub fn distribute(&self, parts: usize) -> Result<Vec<Self>, AmountError> {
        if parts == 0 {
            return Err(AmountError::DivisionByZero);
        }
        let count = i64::try_from(parts).map_err(|_| AmountError::Overflow)?;
        let total = self.minor_units();
        let base = total / count;
        let remainder = total - base * count;
        let extra = usize::try_from(remainder.unsigned_abs()).map_err(|_| AmountError::Overflow)?;
        let sign = total.signum();

        (0..parts)
            .map(|i| {
                let units = if i < extra { base + sign } else { base };
                Self::from_minor_units(units, self.currency())
            })
            .collect()
    }

    /// Allocates `self * weight` for each weight using Largest Remainder.
    ///
    /// The parts sum exactly to `self * sum(weights)` rounded half-to-even,
    /// so weights summing to zero always yield parts summing to zero.
    pub fn allocate(&self, weights: &[Decimal]) -> Result<Vec<Self>, AmountError> {
        if weights.is_empty() {
            return Ok(vec![]);
        }
        let currency = self.currency();
        let total = self.to_decimal();

        let exact: Vec<Decimal> = weights
            .iter()
            .map(|w| total.checked_mul(*w).ok_or(AmountError::Overflow))
            .collect::<Result<_, _>>()?;
        let mut rounded: Vec<Self> = exact
            .iter()
            .map(|e| Self::from_decimal_rounded(*e, currency))
            .collect::<Result<_, _>>()?;

        let weight_sum = weights
            .iter()
            .try_fold(Decimal::ZERO, |acc, w| acc.checked_add(*w))
            .ok_or(AmountError::Overflow)?;
        let target = self.multiply(weight_sum)?;
        let allocated = Self::sum(currency, &rounded)?;
        let residual = target.minor_units() - allocated.minor_units();
        if residual == 0 {
            return Ok(rounded);
        }

        // Rounding error per item, in the direction the residual needs.
        let step = residual.signum();
        let mut order: Vec<(usize, Decimal)> = exact
            .iter()
            .zip(&rounded)
            .enumerate()
            .map(|(i, (e, r))| {
                let diff = *e - r.to_decimal();
                (i, if step > 0 { diff } else { -diff })
            })
            .collect();
        order.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let units = usize::try_from(residual.unsigned_abs()).map_err(|_| AmountError::Overflow)?;
        for (idx, _) in order.iter().cycle().take(units) {
            let adjusted = rounded[*idx].minor_units() + step;
            rounded[*idx] = Self::from_minor_units(adjusted, currency)?;
        }

        Ok(rounded)
    }

    /// Rounds `self * percentage / 100` half-to-even, without redistribution.
    pub fn percentage(&self, percentage: Decimal) -> Result<Self, AmountError> {
        let factor = percentage
            .checked_div(Decimal::ONE_HUNDRED)
            .ok_or(AmountError::Overflow)?;
        let product = self
            .to_decimal()
            .checked_mul(factor)
            .ok_or(AmountError::Overflow)?;
        Self::from_decimal_rounded(product, self.currency())
    }
}
