use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Invoicing status of a permit row. Stored as its Danish name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FakturaStatus {
    Ny,
    Afsendt,
    Faktureret,
    TilFakturering,
    FakturerIkke,
}

impl FakturaStatus {
    pub const ALL: [FakturaStatus; 5] = [
        FakturaStatus::Ny,
        FakturaStatus::Afsendt,
        FakturaStatus::TilFakturering,
        FakturaStatus::Faktureret,
        FakturaStatus::FakturerIkke,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FakturaStatus::Ny => "Ny",
            FakturaStatus::Afsendt => "Afsendt",
            FakturaStatus::Faktureret => "Faktureret",
            FakturaStatus::TilFakturering => "TilFakturering",
            FakturaStatus::FakturerIkke => "FakturerIkke",
        }
    }
}

impl fmt::Display for FakturaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FakturaStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FakturaStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Ukendt fakturastatus: {s}"))
    }
}

impl TryFrom<String> for FakturaStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FakturaStatus> for String {
    fn from(value: FakturaStatus) -> Self {
        value.as_str().to_string()
    }
}

/// What a caseworker asks to do with a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Intent {
    SendToBilling,
    DoNotInvoice,
    Undo,
}

impl Intent {
    pub fn label(&self) -> &'static str {
        match self {
            Intent::SendToBilling => "send til fakturering",
            Intent::DoNotInvoice => "fakturer ikke",
            Intent::Undo => "fortryd",
        }
    }

    /// The only legal (from, to) pair for this intent.
    pub fn edge(&self) -> (FakturaStatus, FakturaStatus) {
        match self {
            Intent::SendToBilling => (FakturaStatus::Ny, FakturaStatus::Afsendt),
            Intent::Undo => (FakturaStatus::Afsendt, FakturaStatus::Ny),
            Intent::DoNotInvoice => (FakturaStatus::Faktureret, FakturaStatus::FakturerIkke),
        }
    }
}

/// Target status for `intent` applied to a row in `current`, or `None` when
/// the transition is not allowed.
pub fn next_status(current: FakturaStatus, intent: Intent) -> Option<FakturaStatus> {
    let (from, to) = intent.edge();
    (current == from).then_some(to)
}

/// The list pages of the application, each a fixed slice of the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListView {
    IkkeFaktureret,
    TilFakturering,
    Faktureret,
    FakturerIkke,
}

impl ListView {
    pub fn statuses(&self) -> &'static [FakturaStatus] {
        match self {
            ListView::IkkeFaktureret => &[FakturaStatus::Ny],
            ListView::TilFakturering => &[FakturaStatus::Afsendt, FakturaStatus::TilFakturering],
            ListView::Faktureret => &[FakturaStatus::Faktureret],
            ListView::FakturerIkke => &[FakturaStatus::FakturerIkke],
        }
    }
}
