//! Locale-style presentation of amounts.
//!
//! The canonical form (`Display`) never changes; these options only affect
//! what a caller renders for humans.

use serde::{Deserialize, Serialize};

use super::money::Amount;

/// How negative amounts are marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignConvention {
    /// `-1,234.56`
    #[default]
    Minus,
    /// `(1,234.56)`
    Parentheses,
    /// `1.234,56-`
    TrailingMinus,
}

/// Presentation options for [`Amount::format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOptions {
    /// Thousands separator; `None` disables grouping.
    pub grouping: Option<char>,
    /// Separator between major and minor units.
    pub decimal_separator: char,
    /// Negative sign style.
    pub sign: SignConvention,
    /// Append the ISO code after the number.
    pub show_currency: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            grouping: Some(','),
            decimal_separator: '.',
            sign: SignConvention::Minus,
            show_currency: false,
        }
    }
}

impl FormatOptions {
    /// German conventions: `1.234,56`.
    #[must_use]
    pub fn german() -> Self {
        Self {
            grouping: Some('.'),
            decimal_separator: ',',
            ..Self::default()
        }
    }

    /// Sets the sign convention.
    #[must_use]
    pub fn with_sign(mut self, sign: SignConvention) -> Self {
        self.sign = sign;
        self
    }

    /// Enables the trailing currency code.
    #[must_use]
    pub fn with_currency(mut self) -> Self {
        self.show_currency = true;
        self
    }
}

impl Amount {
    /// Renders the amount for display.
    #[must_use]
    pub fn format(&self, options: &FormatOptions) -> String {
        let currency = self.currency();
        let exponent = currency.exponent();
        let factor = currency.minor_per_major().unsigned_abs();
        let magnitude = self.minor_units().unsigned_abs();

        let mut body = group_digits(&(magnitude / factor).to_string(), options.grouping);
        if exponent > 0 {
            body.push(options.decimal_separator);
            let width = exponent as usize;
            body.push_str(&format!("{:0width$}", magnitude % factor));
        }

        let mut rendered = if self.is_negative() {
            match options.sign {
                SignConvention::Minus => format!("-{body}"),
                SignConvention::Parentheses => format!("({body})"),
                SignConvention::TrailingMinus => format!("{body}-"),
            }
        } else {
            body
        };

        if options.show_currency {
            rendered.push(' ');
            rendered.push_str(currency.code());
        }
        rendered
    }
}

fn group_digits(digits: &str, separator: Option<char>) -> String {
    let Some(sep) = separator else {
        return digits.to_string();
    };
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}
