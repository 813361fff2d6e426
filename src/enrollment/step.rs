use std::fmt;

/// Wizard position. Moves forward only, apart from explicit `back()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Profile,
    Plan,
    Payment,
    Confirmation,
}

impl WizardStep {
    /// Zero-based position as shown in the step indicator.
    pub fn index(self) -> u8 {
        match self {
            Self::Profile => 0,
            Self::Plan => 1,
            Self::Payment => 2,
            Self::Confirmation => 3,
        }
    }

    /// Where a user starts: profile first unless it is already complete.
    pub fn initial(profile_complete: bool) -> Self {
        if profile_complete { Self::Plan } else { Self::Profile }
    }

    /// The step `back()` returns to, if any.
    pub fn previous(self) -> Option<Self> {
        match self {
            Self::Plan => Some(Self::Profile),
            Self::Payment => Some(Self::Plan),
            Self::Profile | Self::Confirmation => None,
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Profile => "profile",
            Self::Plan => "plan",
            Self::Payment => "payment",
            Self::Confirmation => "confirmation",
        };
        f.write_str(name)
    }
}
