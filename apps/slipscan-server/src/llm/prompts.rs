//! Prompt templates per document type

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::LlmError;

/// Placeholder replaced by the recognized text
pub const OCR_TEXT_PLACEHOLDER: &str = "{{ocr_text}}";

const SALARY_SLIP: &str = "Extract the following from the salary slip: gross salary, \
house rent allowances, conveyance allowances, net salary, basic amount. \
Answer as a numbered list of `<n>. <field>: <value>` lines. Text: {{ocr_text}}";

const BALANCE_SLIP: &str = "Extract the following from the balance slip: account holder name, \
account number, balance, date, bank name. \
Answer as a numbered list of `<n>. <field>: <value>` lines. Text: {{ocr_text}}";

const CASH_SLIP: &str = "Extract the following from the cash slip: transaction date, amount, \
transaction ID, bank/ATM ID. \
Answer as a numbered list of `<n>. <field>: <value>` lines. Text: {{ocr_text}}";

/// Supported document types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    #[serde(rename = "salary slip")]
    SalarySlip,
    #[serde(rename = "balance slip")]
    BalanceSlip,
    #[serde(rename = "cash slip")]
    CashSlip,
}

impl DocumentType {
    pub const ALL: [DocumentType; 3] = [Self::SalarySlip, Self::BalanceSlip, Self::CashSlip];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SalarySlip => "salary slip",
            Self::BalanceSlip => "balance slip",
            Self::CashSlip => "cash slip",
        }
    }

    fn template(&self) -> &'static str {
        match self {
            Self::SalarySlip => SALARY_SLIP,
            Self::BalanceSlip => BALANCE_SLIP,
            Self::CashSlip => CASH_SLIP,
        }
    }

    /// Fill the template with recognized text
    pub fn prompt(&self, ocr_text: &str) -> String {
        self.template().replace(OCR_TEXT_PLACEHOLDER, ocr_text)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| LlmError::UnknownDocumentType(s.to_string()))
    }
}
