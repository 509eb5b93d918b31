//! Baseline request checks shared by every adapter.
//!
//! Adapters call [`check_baseline`] first and then layer their own stricter
//! rules on top; each check returns the first rule violated.

use {
    super::error::ValidationError,
    super::payment::PaymentRequest,
    rust_decimal::Decimal,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_amount: Decimal,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_amount: Decimal::from(1_000_000),
        }
    }
}

pub fn check_baseline(request: &PaymentRequest, limits: &Limits) -> Result<(), ValidationError> {
    check_amount(request.amount, limits)?;
    check_currency(&request.currency)?;
    check_card_number(&request.card_number)?;
    check_expiry_present(&request.expiry_month, &request.expiry_year)?;
    check_cvv(&request.cvv)
}

pub fn check_amount(amount: Decimal, limits: &Limits) -> Result<(), ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount);
    }
    if amount > limits.max_amount {
        return Err(ValidationError::AmountAboveLimit(group_thousands(
            limits.max_amount,
        )));
    }
    Ok(())
}

pub fn check_currency(currency: &str) -> Result<(), ValidationError> {
    if currency.is_empty() {
        return Err(ValidationError::MissingCurrency);
    }
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::MalformedCurrency);
    }
    Ok(())
}

pub fn check_card_number(card_number: &str) -> Result<(), ValidationError> {
    if card_number.is_empty() {
        return Err(ValidationError::MissingCardNumber);
    }
    let len = card_number.chars().count();
    if !(13..=19).contains(&len) {
        return Err(ValidationError::CardNumberLength);
    }
    Ok(())
}

pub fn check_expiry_present(month: &str, year: &str) -> Result<(), ValidationError> {
    if month.is_empty() || year.is_empty() {
        return Err(ValidationError::MissingExpiry);
    }
    Ok(())
}

pub fn check_cvv(cvv: &str) -> Result<(), ValidationError> {
    if cvv.is_empty() {
        return Err(ValidationError::MissingCvv);
    }
    let len = cvv.chars().count();
    if !(3..=4).contains(&len) {
        return Err(ValidationError::CvvLength);
    }
    Ok(())
}

pub fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// `1000000` -> `1,000,000`; fractional part kept as is.
fn group_thousands(value: Decimal) -> String {
    let text = value.normalize().to_string();
    let (int, frac) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };
    let (sign, digits) = match int.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}
