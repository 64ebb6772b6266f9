/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! CNPJ (Brazilian company tax id) normalization and check digit validation

use crate::error::AppError;
use once_cell::sync::Lazy;
use regex::Regex;

static NON_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new("[^0-9]").expect("static regex is valid"));

const CNPJ_LEN: usize = 14;

/// Normalizes and validates a CNPJ
///
/// Punctuation is stripped and the number is left-padded with zeros to 14
/// digits. Numbers made of a single repeated digit and numbers whose two
/// check digits do not match are rejected.
///
/// # Returns
/// The normalized 14 digit string
///
/// # Example
/// ```
/// use msc_client::utils::cnpj::validate_cnpj;
///
/// assert_eq!(validate_cnpj("20.299.078/0001-66").unwrap(), "20299078000166");
/// assert!(validate_cnpj("20299078000167").is_err());
/// ```
pub fn validate_cnpj(cnpj: &str) -> Result<String, AppError> {
    let digits = NON_DIGITS.replace_all(cnpj, "");
    if digits.len() > CNPJ_LEN {
        return Err(invalid(cnpj));
    }
    let normalized = format!("{digits:0>CNPJ_LEN$}");

    let values: Vec<u32> = normalized.chars().filter_map(|c| c.to_digit(10)).collect();
    if values.iter().all(|d| *d == values[0]) {
        return Err(invalid(cnpj));
    }

    let reversed: Vec<u32> = values.iter().rev().copied().collect();
    // reversed[1] is the first check digit, reversed[0] the second
    for position in [2usize, 1] {
        let sum: u32 = reversed[position..]
            .iter()
            .zip((2..=9).cycle())
            .map(|(digit, weight)| digit * weight)
            .sum();
        let expected = (sum * 10 % 11) % 10;
        if reversed[position - 1] != expected {
            return Err(invalid(cnpj));
        }
    }

    Ok(normalized)
}

fn invalid(cnpj: &str) -> AppError {
    AppError::InvalidInput(format!("invalid CNPJ: {cnpj}"))
}
