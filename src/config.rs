use crate::constants::{MAX_AMOUNT, MAX_TEXT_LENGTH, SPLIT_TOLERANCE};
use dotenv::dotenv;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub split_tolerance: Decimal,
    pub max_amount: Decimal,
    pub max_text_length: usize,
}

/// Input limits the services validate against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub split_tolerance: Decimal,
    pub max_amount: Decimal,
    pub max_text_length: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            split_tolerance: SPLIT_TOLERANCE,
            max_amount: MAX_AMOUNT,
            max_text_length: MAX_TEXT_LENGTH,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            split_tolerance: env::var("SPLIT_TOLERANCE")
                .ok()
                .and_then(|v| v.parse::<Decimal>().ok())
                .filter(|t| !t.is_sign_negative())
                .unwrap_or(SPLIT_TOLERANCE),
            max_amount: env::var("MAX_AMOUNT")
                .ok()
                .and_then(|v| v.parse::<Decimal>().ok())
                .filter(|m| m.is_sign_positive() && !m.is_zero())
                .unwrap_or(MAX_AMOUNT),
            max_text_length: env::var("MAX_TEXT_LENGTH")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(MAX_TEXT_LENGTH),
        }
    }

    pub fn limits(&self) -> Limits {
        Limits {
            split_tolerance: self.split_tolerance,
            max_amount: self.max_amount,
            max_text_length: self.max_text_length,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let limits = Limits::default();
        Config {
            log_level: "info".to_string(),
            split_tolerance: limits.split_tolerance,
            max_amount: limits.max_amount,
            max_text_length: limits.max_text_length,
        }
    }
}

// Global static accessible everywhere
pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
