//! Input checks run before any ledger algorithm sees the data.
//!
//! Existence and membership checks need storage and live in the services; this
//! module only looks at the values themselves.

use crate::config::Limits;
use crate::constants::PERCENTAGE_TOTAL;
use crate::core::errors::ExpenseError;
use crate::core::models::{SettlementRequest, SplitType, TransactionDraft};
use crate::core::money::{is_whole_cents, within};
use rust_decimal::Decimal;
use std::collections::HashSet;

pub fn validate_text(field: &str, value: &str, limits: &Limits) -> Result<(), ExpenseError> {
    if value.trim().is_empty() {
        return Err(ExpenseError::invalid_input(
            field,
            format!("Invalid {}", field),
            format!("{} cannot be empty", field),
        ));
    }
    if value.chars().count() > limits.max_text_length {
        return Err(ExpenseError::invalid_input(
            field,
            format!("{} Too Long", field),
            format!("{} cannot exceed {} characters", field, limits.max_text_length),
        ));
    }
    if value.chars().any(|c| c.is_control()) {
        return Err(ExpenseError::invalid_input(
            field,
            format!("Invalid {}", field),
            format!("{} contains invalid characters", field),
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ExpenseError> {
    if !email.contains('@') || !email.contains('.') || email.len() < 5 {
        return Err(ExpenseError::InvalidEmail(email.to_string()));
    }
    Ok(())
}

pub fn validate_amount(field: &str, amount: Decimal, limits: &Limits) -> Result<(), ExpenseError> {
    if amount <= Decimal::ZERO {
        return Err(ExpenseError::invalid_input(
            field,
            "Invalid Amount",
            "Amount must be greater than 0",
        ));
    }
    if amount > limits.max_amount {
        return Err(ExpenseError::invalid_input(
            field,
            "Amount Too Large",
            format!("Amount cannot exceed {}", limits.max_amount),
        ));
    }
    if !is_whole_cents(amount) {
        return Err(ExpenseError::invalid_input(
            field,
            "Invalid Amount",
            "Amount cannot have more than 2 decimal places",
        ));
    }
    Ok(())
}

/// Checks the transaction's own values and the split policy's preconditions.
pub fn validate_draft(draft: &TransactionDraft, limits: &Limits) -> Result<(), ExpenseError> {
    validate_text("description", &draft.description, limits)?;
    validate_amount("amount", draft.amount, limits)?;

    if draft.participants.is_empty() {
        return Err(ExpenseError::NoParticipants);
    }
    let mut seen = HashSet::new();
    for detail in &draft.participants {
        if !seen.insert(detail.user_id.as_str()) {
            return Err(ExpenseError::DuplicateParticipant(detail.user_id.clone()));
        }
    }

    let values: Vec<Decimal> = draft
        .participants
        .iter()
        .map(|d| match draft.split_type {
            SplitType::Equal => Decimal::ZERO,
            SplitType::Exact => d.amount.unwrap_or_default(),
            SplitType::Percentage => d.percentage.unwrap_or_default(),
            SplitType::Shares => d.shares.unwrap_or_default(),
        })
        .collect();
    if values.iter().any(|v| v.is_sign_negative() && !v.is_zero()) {
        return Err(ExpenseError::InvalidSplit(format!(
            "{} values cannot be negative",
            draft.split_type
        )));
    }

    let sum: Decimal = values.iter().copied().sum();
    match draft.split_type {
        SplitType::Exact if !within(sum, draft.amount, limits.split_tolerance) => {
            Err(ExpenseError::InvalidSplit(format!(
                "split amounts add up to {} but the total is {}",
                sum, draft.amount
            )))
        }
        SplitType::Percentage if !within(sum, PERCENTAGE_TOTAL, limits.split_tolerance) => Err(
            ExpenseError::InvalidSplit(format!("percentages add up to {} instead of 100", sum)),
        ),
        _ => Ok(()),
    }
}

pub fn validate_settlement(request: &SettlementRequest, limits: &Limits) -> Result<(), ExpenseError> {
    if request.from_user_id == request.to_user_id {
        return Err(ExpenseError::SelfSettlement);
    }
    validate_amount("amount", request.amount, limits)?;
    if let Some(note) = &request.note {
        validate_text("note", note, limits)?;
    }
    Ok(())
}
