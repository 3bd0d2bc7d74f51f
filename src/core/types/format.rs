use std::str::FromStr;

use strum::{Display, EnumString};

use crate::types::{AppError, AppResult};

/// How command summaries are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl OutputFormat {
    pub fn parse(format: &str) -> AppResult<Self> {
        Self::from_str(format.trim()).map_err(|_| AppError::InvalidFormat(format.to_string()))
    }
}
