use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;

use crate::core::{ComprobanteError, round2};

/// Integer parts must stay below one trillion (millón de millones).
const LIMIT: u64 = 1_000_000_000_000;

const UNITS: [&str; 10] = [
    "", "UNO", "DOS", "TRES", "CUATRO", "CINCO", "SEIS", "SIETE", "OCHO", "NUEVE",
];

const TEENS: [&str; 10] = [
    "DIEZ",
    "ONCE",
    "DOCE",
    "TRECE",
    "CATORCE",
    "QUINCE",
    "DIECISEIS",
    "DIECISIETE",
    "DIECIOCHO",
    "DIECINUEVE",
];

const TWENTIES: [&str; 10] = [
    "VEINTE",
    "VEINTIUNO",
    "VEINTIDOS",
    "VEINTITRES",
    "VEINTICUATRO",
    "VEINTICINCO",
    "VEINTISEIS",
    "VEINTISIETE",
    "VEINTIOCHO",
    "VEINTINUEVE",
];

const TENS: [&str; 10] = [
    "", "", "", "TREINTA", "CUARENTA", "CINCUENTA", "SESENTA", "SETENTA", "OCHENTA", "NOVENTA",
];

const HUNDREDS: [&str; 10] = [
    "",
    "CIENTO",
    "DOSCIENTOS",
    "TRESCIENTOS",
    "CUATROCIENTOS",
    "QUINIENTOS",
    "SEISCIENTOS",
    "SETECIENTOS",
    "OCHOCIENTOS",
    "NOVECIENTOS",
];

/// Render an amount the way it is printed on fiscal documents.
///
/// The amount is rounded to cents first; the integer part is written out
/// and the cents follow as a fraction of 100.
///
/// ```
/// use comprobante::words::to_legal_words;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(to_legal_words(dec!(0)).unwrap(), "CERO CON 00/100");
/// assert_eq!(to_legal_words(dec!(21.5)).unwrap(), "VEINTIUNO CON 50/100");
/// assert_eq!(to_legal_words(dec!(1180)).unwrap(), "MIL CIENTO OCHENTA CON 00/100");
/// ```
pub fn to_legal_words(amount: Decimal) -> Result<String, ComprobanteError> {
    if amount < Decimal::ZERO {
        return Err(ComprobanteError::InvalidAmount(format!(
            "cannot render negative amount {amount}"
        )));
    }

    let rounded = round2(amount);
    let whole = rounded.trunc();
    let integer = whole
        .to_u64()
        .filter(|n| *n < LIMIT)
        .ok_or_else(|| {
            ComprobanteError::InvalidAmount(format!("amount {amount} is too large to render"))
        })?;
    let cents = ((rounded - whole) * dec!(100))
        .to_u32()
        .ok_or_else(|| ComprobanteError::InvalidAmount(format!("cannot split cents of {amount}")))?;

    Ok(format!("{} CON {cents:02}/100", integer_words(integer)))
}

/// Like [`to_legal_words`], followed by the currency name (e.g. "SOLES").
pub fn to_legal_words_with_currency(
    amount: Decimal,
    currency: &str,
) -> Result<String, ComprobanteError> {
    let words = to_legal_words(amount)?;
    let currency = currency.trim();
    if currency.is_empty() {
        return Ok(words);
    }
    Ok(format!("{words} {}", currency.to_uppercase()))
}

fn integer_words(n: u64) -> String {
    if n == 0 {
        return "CERO".to_string();
    }

    let millions = n / 1_000_000;
    let rest = n % 1_000_000;

    let mut parts = Vec::new();
    match millions {
        0 => {}
        1 => parts.push("UN MILLON".to_string()),
        m => parts.push(format!("{} MILLONES", below_million(m, true))),
    }
    if rest > 0 {
        parts.push(below_million(rest, false));
    }
    parts.join(" ")
}

/// 1..=999_999. `apocope` shortens a trailing UNO to UN before a noun.
fn below_million(n: u64, apocope: bool) -> String {
    let thousands = n / 1000;
    let rest = n % 1000;

    let mut parts = Vec::new();
    match thousands {
        0 => {}
        1 => parts.push("MIL".to_string()),
        t => parts.push(format!("{} MIL", below_thousand(t, true))),
    }
    if rest > 0 {
        parts.push(below_thousand(rest, apocope));
    }
    parts.join(" ")
}

/// 1..=999.
fn below_thousand(n: u64, apocope: bool) -> String {
    if n == 100 {
        return "CIEN".to_string();
    }

    let hundreds = (n / 100) as usize;
    let rest = n % 100;

    let mut parts = Vec::new();
    if hundreds > 0 {
        parts.push(HUNDREDS[hundreds].to_string());
    }
    if rest > 0 {
        parts.push(below_hundred(rest, apocope));
    }
    parts.join(" ")
}

/// 1..=99. The conjunction Y only ever joins tens and units.
fn below_hundred(n: u64, apocope: bool) -> String {
    let tens = (n / 10) as usize;
    let units = (n % 10) as usize;

    match tens {
        0 => unit(units, apocope).to_string(),
        1 => TEENS[units].to_string(),
        2 if units == 1 && apocope => "VEINTIUN".to_string(),
        2 => TWENTIES[units].to_string(),
        _ if units == 0 => TENS[tens].to_string(),
        _ => format!("{} Y {}", TENS[tens], unit(units, apocope)),
    }
}

fn unit(n: usize, apocope: bool) -> &'static str {
    if n == 1 && apocope { "UN" } else { UNITS[n] }
}
