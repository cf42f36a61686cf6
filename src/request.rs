// Inbound request shapes and their field validation.
//
// Every field is optional at the serde level so that a missing field is
// reported the same way as a blank one: as an entry in `FieldErrors`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::account::NewAccount;
use crate::service::TransactionIntent;

/// field name → message, serialized as a flat JSON object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        FieldErrors::default()
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.0.entry(field.to_string()).or_insert_with(|| message.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        write!(f, "{}", parts.join(", "))
    }
}

impl std::error::Error for FieldErrors {}

fn required_text(errors: &mut FieldErrors, field: &str, value: &Option<String>, message: &str) -> String {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => {
            errors.add(field, message);
            String::new()
        }
    }
}

fn positive_amount(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<Decimal>,
    required: &str,
    positive: &str,
) -> Decimal {
    match value {
        Some(v) if v > Decimal::ZERO => v,
        Some(_) => {
            errors.add(field, positive);
            Decimal::ZERO
        }
        None => {
            errors.add(field, required);
            Decimal::ZERO
        }
    }
}

// ============================================================================
// ACCOUNT REQUEST
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRequest {
    pub account_number: Option<String>,
    pub account_type: Option<String>,
    pub initial_balance: Option<Decimal>,
    pub owner_name: Option<String>,
}

impl AccountRequest {
    pub fn validate(&self) -> Result<NewAccount, FieldErrors> {
        let mut errors = FieldErrors::new();

        let account_number = required_text(
            &mut errors,
            "accountNumber",
            &self.account_number,
            "Account number is required",
        );
        let account_type = required_text(
            &mut errors,
            "accountType",
            &self.account_type,
            "Account type is required",
        );
        let initial_balance = positive_amount(
            &mut errors,
            "initialBalance",
            self.initial_balance,
            "Initial balance is required",
            "Initial balance must be positive",
        );
        let owner_name = required_text(
            &mut errors,
            "ownerName",
            &self.owner_name,
            "Owner name is required",
        );

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewAccount::new(account_number, account_type, initial_balance, owner_name))
    }
}

// ============================================================================
// TRANSACTION REQUEST
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub transaction_type: Option<String>,
    pub account_number: Option<String>,
    pub amount: Option<Decimal>,
}

impl TransactionRequest {
    pub fn validate(&self) -> Result<TransactionIntent, FieldErrors> {
        let mut errors = FieldErrors::new();

        let transaction_type = required_text(
            &mut errors,
            "transactionType",
            &self.transaction_type,
            "Transaction type is required",
        );
        let account_number = required_text(
            &mut errors,
            "accountNumber",
            &self.account_number,
            "Account number is required",
        );
        let amount = positive_amount(
            &mut errors,
            "amount",
            self.amount,
            "Amount is required",
            "Amount must be positive",
        );

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(TransactionIntent::new(transaction_type, account_number, amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::dec;

    #[test]
    fn test_valid_account_request() {
        let request: AccountRequest = serde_json::from_str(
            r#"{"accountNumber":"ACC1","accountType":"savings","initialBalance":"1000.00","ownerName":"John Doe"}"#,
        )
        .unwrap();

        let new = request.validate().unwrap();

        assert_eq!(new.account_number, "ACC1");
        assert_eq!(new.initial_balance, dec("1000.00"));
    }

    #[test]
    fn test_account_request_collects_every_field_error() {
        let request = AccountRequest {
            account_number: Some("   ".to_string()),
            account_type: None,
            initial_balance: Some(dec("0")),
            owner_name: None,
        };

        let errors = request.validate().unwrap_err();

        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get("accountNumber"), Some("Account number is required"));
        assert_eq!(errors.get("accountType"), Some("Account type is required"));
        assert_eq!(errors.get("initialBalance"), Some("Initial balance must be positive"));
        assert_eq!(errors.get("ownerName"), Some("Owner name is required"));
    }

    #[test]
    fn test_transaction_request_amount_rules() {
        let missing = TransactionRequest {
            transaction_type: Some("deposit".to_string()),
            account_number: Some("ACC1".to_string()),
            amount: None,
        };
        assert_eq!(missing.validate().unwrap_err().get("amount"), Some("Amount is required"));

        let negative = TransactionRequest { amount: Some(dec("-1")), ..missing.clone() };
        assert_eq!(negative.validate().unwrap_err().get("amount"), Some("Amount must be positive"));

        let ok = TransactionRequest { amount: Some(dec("12.5")), ..missing };
        let intent = ok.validate().unwrap();
        assert_eq!(intent.transaction_type, "deposit");
        assert_eq!(intent.amount, dec("12.5"));
    }

    #[test]
    fn test_field_errors_serialize_flat() {
        let mut errors = FieldErrors::new();
        errors.add("amount", "Amount is required");

        let json = serde_json::to_value(&errors).unwrap();

        assert_eq!(json, serde_json::json!({"amount": "Amount is required"}));
    }
}
