//! RUC modulus-11 check digit.

const WEIGHTS: [u32; 10] = [5, 4, 3, 2, 7, 6, 5, 4, 3, 2];

/// Compute the expected check digit of an 11-digit RUC.
///
/// Only the first ten digits are weighted. Returns `None` if the input is
/// not exactly 11 ASCII digits.
pub fn tax_id_check_digit(ruc: &str) -> Option<u8> {
    if ruc.len() != 11 || !ruc.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let sum: u32 = ruc
        .bytes()
        .take(10)
        .zip(WEIGHTS)
        .map(|(b, w)| u32::from(b - b'0') * w)
        .sum();

    let digit = match 11 - sum % 11 {
        10 => 0,
        11 => 1,
        d => d,
    };
    Some(digit as u8)
}

/// Whether the last digit of `ruc` matches its computed check digit.
pub(crate) fn has_valid_check_digit(ruc: &str) -> bool {
    match (tax_id_check_digit(ruc), ruc.bytes().last()) {
        (Some(expected), Some(last)) => last - b'0' == expected,
        _ => false,
    }
}
