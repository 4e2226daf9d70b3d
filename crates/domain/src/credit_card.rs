//! Credit card block embedded in an order and its validation rules.
//!
//! Validation is purely local: the expiry must not be before the current
//! month and the number must fit the pattern registered for the card type.
//! No issuer is contacted.

use std::sync::{Arc, LazyLock};

use chrono::Datelike;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::validation::{CheckError, require_text};

static VISA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^4[0-9]{15}$").expect("valid Visa pattern"));
static MASTER_CARD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^5[1-5][0-9]{14}$").expect("valid MasterCard pattern"));
static AMERICAN_EXPRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^3[47][0-9]{13}$").expect("valid American Express pattern"));

/// Card networks with a registered numbering pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardType {
    Visa,
    MasterCard,
    AmericanExpress,
}

impl CardType {
    /// Parses a declared card type, ignoring case and spaces.
    pub fn parse(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "visa" => Some(CardType::Visa),
            "mastercard" => Some(CardType::MasterCard),
            "americanexpress" | "amex" => Some(CardType::AmericanExpress),
            _ => None,
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            CardType::Visa => &VISA,
            CardType::MasterCard => &MASTER_CARD,
            CardType::AmericanExpress => &AMERICAN_EXPRESS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Visa => "Visa",
            CardType::MasterCard => "MasterCard",
            CardType::AmericanExpress => "American Express",
        }
    }
}

impl std::fmt::Display for CardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Credit card details as entered by the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCard {
    pub card_type: String,
    pub number: String,
    /// Expiry as `MM/YY`.
    pub expiry_date: String,
}

impl CreditCard {
    pub fn new(
        card_type: impl Into<String>,
        number: impl Into<String>,
        expiry_date: impl Into<String>,
    ) -> Self {
        Self {
            card_type: card_type.into(),
            number: number.into(),
            expiry_date: expiry_date.into(),
        }
    }

    /// Builds a card block from its three fields.
    ///
    /// Returns `None` when all three are blank, which means the order is paid
    /// by another instrument (cash, cheque).
    pub fn from_fields(card_type: &str, number: &str, expiry_date: &str) -> Option<Self> {
        let card = Self::new(card_type.trim(), number.trim(), expiry_date.trim());
        (!card.is_empty()).then_some(card)
    }

    pub fn is_empty(&self) -> bool {
        self.card_type.trim().is_empty()
            && self.number.trim().is_empty()
            && self.expiry_date.trim().is_empty()
    }

    /// The number with spaces and dashes removed.
    pub fn digits(&self) -> String {
        self.number
            .chars()
            .filter(|c| *c != ' ' && *c != '-')
            .collect()
    }
}

/// Validates card blocks against the current month and the type registry.
#[derive(Clone)]
pub struct CreditCardValidator {
    clock: Arc<dyn Clock>,
}

impl CreditCardValidator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn validate(&self, card: &CreditCard) -> Result<(), CheckError> {
        require_text("credit_card_type", &card.card_type, "Invalid credit card type")?;
        require_text("credit_card_number", &card.number, "Invalid credit card number")?;
        require_text(
            "credit_card_expiry_date",
            &card.expiry_date,
            "Invalid credit card expiry date",
        )?;

        self.check_expiry(&card.expiry_date)?;
        check_number(card)
    }

    fn check_expiry(&self, expiry: &str) -> Result<(), CheckError> {
        let (month, year) = parse_expiry(expiry).ok_or_else(|| {
            CheckError::new(
                "credit_card_expiry_date",
                format!("Invalid credit card expiry date: {expiry}"),
            )
        })?;

        let today = self.clock.today();
        if (year, month) < (today.year(), today.month()) {
            return Err(CheckError::new(
                "credit_card_expiry_date",
                format!("Credit card expired: {expiry}"),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for CreditCardValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreditCardValidator")
            .field("today", &self.clock.today())
            .finish()
    }
}

/// Parses `MM/YY` into (month, four-digit year).
fn parse_expiry(expiry: &str) -> Option<(u32, i32)> {
    let (month, year) = expiry.trim().split_once('/')?;
    let two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
    if !two_digits(month) || !two_digits(year) {
        return None;
    }
    let month: u32 = month.parse().ok()?;
    let year: i32 = year.parse().ok()?;
    (1..=12).contains(&month).then_some((month, 2000 + year))
}

fn check_number(card: &CreditCard) -> Result<(), CheckError> {
    let card_type = CardType::parse(&card.card_type).ok_or_else(|| {
        CheckError::new(
            "credit_card_type",
            format!("Unknown credit card type: {}", card.card_type),
        )
    })?;

    let digits = card.digits();
    if !card_type.pattern().is_match(&digits) {
        return Err(CheckError::new(
            "credit_card_number",
            format!("Invalid {card_type} card number"),
        ));
    }

    // Four identical digits in a row mark a placeholder number
    if digits
        .as_bytes()
        .windows(4)
        .any(|w| w.iter().all(|&b| b == w[0]))
    {
        return Err(CheckError::new(
            "credit_card_number",
            format!("Invalid {card_type} card number"),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;

    fn validator_on(year: i32, month: u32, day: u32) -> CreditCardValidator {
        let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        CreditCardValidator::new(Arc::new(FixedClock::new(date)))
    }

    fn validator() -> CreditCardValidator {
        validator_on(2017, 6, 15)
    }

    #[test]
    fn valid_visa_passes() {
        let card = CreditCard::new("Visa", "4564 1231 4564 1222", "10/18");
        assert!(validator().validate(&card).is_ok());
    }

    #[test]
    fn expired_card_fails_on_expiry() {
        let card = CreditCard::new("Visa", "4564 1231 4564 1222", "10/02");
        let err = validator().validate(&card).unwrap_err();
        assert_eq!(err.field, "credit_card_expiry_date");
    }

    #[test]
    fn expiry_in_current_month_is_still_valid() {
        let card = CreditCard::new("Visa", "4564 1231 4564 1222", "06/17");
        assert!(validator().validate(&card).is_ok());

        let card = CreditCard::new("Visa", "4564 1231 4564 1222", "05/17");
        assert!(validator().validate(&card).is_err());
    }

    #[test]
    fn malformed_expiry_fails() {
        for expiry in ["13/20", "1/20", "10-20", "ab/cd", "10/2020", "+9/18", "1/-1", "١٠/١٨"] {
            let card = CreditCard::new("Visa", "4564 1231 4564 1222", expiry);
            let err = validator().validate(&card).unwrap_err();
            assert_eq!(err.field, "credit_card_expiry_date", "expiry {expiry}");
        }
    }

    #[test]
    fn placeholder_number_fails() {
        let card = CreditCard::new("Visa", "4564 1231 4564 1111", "10/18");
        let err = validator().validate(&card).unwrap_err();
        assert_eq!(err.field, "credit_card_number");
    }

    #[test]
    fn non_ascii_digits_fail() {
        let card = CreditCard::new("Visa", "4٥٦٤١٢٣١٤٥٦٤١٢٢٢", "10/18");
        let err = validator().validate(&card).unwrap_err();
        assert_eq!(err.field, "credit_card_number");

        let card = CreditCard::new("MasterCard", "5４12 3456 7890 1234", "10/18");
        assert!(validator().validate(&card).is_err());
    }

    #[test]
    fn number_must_match_declared_type() {
        // Valid Visa shape declared as MasterCard
        let card = CreditCard::new("MasterCard", "4564 1231 4564 1222", "10/18");
        assert!(validator().validate(&card).is_err());

        // Too short for Visa
        let card = CreditCard::new("Visa", "4564 1231 4564", "10/18");
        assert!(validator().validate(&card).is_err());

        let card = CreditCard::new("MasterCard", "5412-3456-7890-1234", "10/18");
        assert!(validator().validate(&card).is_ok());

        let card = CreditCard::new("American Express", "3714 496353 98431", "10/18");
        assert!(validator().validate(&card).is_ok());
    }

    #[test]
    fn unknown_type_fails() {
        let card = CreditCard::new("Diners", "4564 1231 4564 1222", "10/18");
        let err = validator().validate(&card).unwrap_err();
        assert_eq!(err.field, "credit_card_type");
    }

    #[test]
    fn partially_filled_block_fails_on_first_missing_field() {
        let card = CreditCard::new("Visa", "", "10/18");
        let err = validator().validate(&card).unwrap_err();
        assert_eq!(err.field, "credit_card_number");
    }

    #[test]
    fn from_fields_treats_all_blank_as_no_card() {
        assert!(CreditCard::from_fields("", "", "").is_none());
        assert!(CreditCard::from_fields(" ", "", "  ").is_none());
        assert!(CreditCard::from_fields("Visa", "", "").is_some());
    }

    #[test]
    fn card_type_parsing_is_lenient() {
        assert_eq!(CardType::parse("VISA"), Some(CardType::Visa));
        assert_eq!(CardType::parse("Master Card"), Some(CardType::MasterCard));
        assert_eq!(CardType::parse("amex"), Some(CardType::AmericanExpress));
        assert_eq!(CardType::parse(""), None);
    }
}
