//! Decimal money helpers shared by the record store and the aggregation code.
//!
//! Amounts are stored as TEXT holding the decimal's canonical string so that
//! they survive any number of read-modify-write cycles without binary
//! floating-point drift.

use std::str::FromStr;

use rusqlite::{Row, types::Type};
use rust_decimal::Decimal;

use crate::Error;

/// The largest magnitude accepted for a single amount, 99,999,999.99.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Check that `amount` fits within [MAX_AMOUNT] in either direction.
///
/// # Errors
/// Returns [Error::Validation] naming `field_name` if the amount is too large.
pub(crate) fn require_amount(field_name: &str, amount: Decimal) -> Result<(), Error> {
    if amount.abs() > MAX_AMOUNT {
        Err(Error::Validation(format!(
            "{field_name} must be between -{MAX_AMOUNT} and {MAX_AMOUNT}"
        )))
    } else {
        Ok(())
    }
}

/// Read the decimal amount stored at column `index` of `row`.
///
/// # Errors
/// Returns [rusqlite::Error::FromSqlConversionFailure] if the stored text is not a decimal.
pub(crate) fn get_amount(row: &Row, index: usize) -> Result<Decimal, rusqlite::Error> {
    let text: String = row.get(index)?;

    Decimal::from_str(&text).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error))
    })
}

/// Express `part` as a percentage of `whole`.
///
/// Returns `None` when `whole` is zero or the result does not fit in a [Decimal].
pub fn percentage(part: Decimal, whole: Decimal) -> Option<Decimal> {
    part.checked_div(whole)?
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|percent| percent.normalize())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use rust_decimal::Decimal;

    use crate::Error;

    use super::{MAX_AMOUNT, get_amount, percentage, require_amount};

    #[test]
    fn max_amount_is_largest_two_place_decimal() {
        assert_eq!(MAX_AMOUNT, Decimal::new(9_999_999_999, 2));
    }

    #[test]
    fn amounts_beyond_max_are_rejected() {
        assert_eq!(require_amount("amount", MAX_AMOUNT), Ok(()));
        assert_eq!(require_amount("amount", -MAX_AMOUNT), Ok(()));
        assert!(matches!(
            require_amount("amount", MAX_AMOUNT + Decimal::new(1, 2)),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn percentage_of_whole() {
        assert_eq!(
            percentage(Decimal::new(80, 0), Decimal::new(200, 0)),
            Some(Decimal::new(40, 0))
        );
    }

    #[test]
    fn percentage_of_zero_is_none() {
        assert_eq!(percentage(Decimal::new(500, 0), Decimal::ZERO), None);
    }

    #[test]
    fn amounts_round_trip_through_text() {
        let connection = Connection::open_in_memory().unwrap();
        connection
            .execute("CREATE TABLE amount (value TEXT)", ())
            .unwrap();
        let want = Decimal::new(1234567, 2);
        connection
            .execute(
                "INSERT INTO amount (value) VALUES (?1)",
                (want.to_string(),),
            )
            .unwrap();

        let got = connection
            .query_row("SELECT value FROM amount", [], |row| get_amount(row, 0))
            .unwrap();

        assert_eq!(got, want);
        assert_eq!(got.to_string(), "12345.67");
    }

    #[test]
    fn malformed_amount_is_conversion_error() {
        let connection = Connection::open_in_memory().unwrap();

        let result = connection.query_row("SELECT 'twelve'", [], |row| get_amount(row, 0));

        assert!(matches!(
            result,
            Err(rusqlite::Error::FromSqlConversionFailure(0, _, _))
        ));
    }
}
