use std::{fmt::Display, str::FromStr};

use anyhow::bail;
use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    #[default]
    Processing,
    Completed,
    Failed,
}

impl PurchaseStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PurchaseStatus::Processing)
    }
}

impl Display for PurchaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let purchase_status = match self {
            PurchaseStatus::Processing => "processing",
            PurchaseStatus::Completed => "completed",
            PurchaseStatus::Failed => "failed",
        };
        write!(f, "{}", purchase_status)
    }
}

impl FromStr for PurchaseStatus {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "processing" => Ok(PurchaseStatus::Processing),
            "completed" => Ok(PurchaseStatus::Completed),
            "failed" => Ok(PurchaseStatus::Failed),
            other => bail!("unknown purchase status: {other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_stored_value() {
        for status in [
            PurchaseStatus::Processing,
            PurchaseStatus::Completed,
            PurchaseStatus::Failed,
        ] {
            assert_eq!(status.to_string().parse::<PurchaseStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!("refunded".parse::<PurchaseStatus>().is_err());
    }
}
