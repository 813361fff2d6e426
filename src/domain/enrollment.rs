use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// Number of monthly payments in the installment plan.
pub const INSTALLMENT_COUNT: u32 = 3;
/// Multiplier applied to the fee when paying in installments.
pub const INSTALLMENT_SURCHARGE: f64 = 1.1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentPlan {
    #[default]
    Full,
    Installment,
}

impl PaymentPlan {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Installment => "installment",
        }
    }

    /// Prices a course fee under this plan.
    pub fn quote(self, fee: f64) -> PlanQuote {
        match self {
            Self::Full => PlanQuote {
                plan: self,
                monthly: None,
                installments: 1,
                total: fee,
            },
            Self::Installment => PlanQuote {
                plan: self,
                monthly: Some((fee / f64::from(INSTALLMENT_COUNT)).ceil()),
                installments: INSTALLMENT_COUNT,
                total: fee * INSTALLMENT_SURCHARGE,
            },
        }
    }
}

impl fmt::Display for PaymentPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentPlan {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "installment" => Ok(Self::Installment),
            other => Err(format!("unknown payment plan: {other}")),
        }
    }
}

/// Price breakdown shown on the plan step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanQuote {
    pub plan: PaymentPlan,
    pub monthly: Option<f64>,
    pub installments: u32,
    pub total: f64,
}

/// Wizard-scoped record of what is being enrolled in and how.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrollmentData {
    pub course_id: Option<String>,
    pub payment_plan: PaymentPlan,
    pub profile_complete: bool,
}

/// Converts a rupee amount to paise, rounding to the nearest paisa.
pub fn to_paise(amount: f64) -> u64 {
    (amount.max(0.0) * 100.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(4999.0, 1667.0)]
    #[case(3000.0, 1000.0)]
    #[case(1000.0, 334.0)]
    #[case(1.0, 1.0)]
    fn test_installment_quote(#[case] fee: f64, #[case] monthly: f64) {
        let quote = PaymentPlan::Installment.quote(fee);
        assert_eq!(quote.monthly, Some(monthly));
        assert_eq!(quote.installments, 3);
        assert_eq!(quote.total, fee * 1.1);
    }

    #[rstest]
    #[case(4999.0)]
    #[case(0.0)]
    fn test_full_quote_is_the_fee(#[case] fee: f64) {
        let quote = PaymentPlan::Full.quote(fee);
        assert_eq!(quote.total, fee);
        assert_eq!(quote.monthly, None);
    }

    #[rstest]
    #[case(4999.0, 499_900)]
    #[case(49.999, 5000)]
    #[case(-5.0, 0)]
    fn test_to_paise_rounds(#[case] amount: f64, #[case] paise: u64) {
        assert_eq!(to_paise(amount), paise);
    }

    #[test]
    fn test_plan_parsing() {
        assert_eq!("Installment".parse::<PaymentPlan>(), Ok(PaymentPlan::Installment));
        assert!("weekly".parse::<PaymentPlan>().is_err());
        assert_eq!(serde_json::to_string(&PaymentPlan::Full).unwrap(), "\"full\"");
    }
}
