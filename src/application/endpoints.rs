/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/
use std::fmt;

/// Path roots of the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiNamespace {
    /// Token issuance
    Authenticate,
    /// Contracts
    Contracts,
    /// Position reports
    Positions,
    /// Recurrences, their operations and receivable units
    Recurrences,
}

impl ApiNamespace {
    /// Path segment of the namespace
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiNamespace::Authenticate => "authenticate",
            ApiNamespace::Contracts => "contracts",
            ApiNamespace::Positions => "positions",
            ApiNamespace::Recurrences => "recurrences",
        }
    }
}

impl fmt::Display for ApiNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Joins base URL, namespace and optional path
///
/// ```
/// use msc_client::application::endpoints::{ApiNamespace, url};
///
/// assert_eq!(
///     url("https://api.example.com/", ApiNamespace::Contracts, Some("/cancel")),
///     "https://api.example.com/contracts/cancel"
/// );
/// assert_eq!(
///     url("https://api.example.com", ApiNamespace::Contracts, None),
///     "https://api.example.com/contracts"
/// );
/// ```
#[must_use]
pub fn url(base_url: &str, namespace: ApiNamespace, path: Option<&str>) -> String {
    let base = base_url.trim_end_matches('/');
    match path.map(|p| p.trim_matches('/')).filter(|p| !p.is_empty()) {
        Some(path) => format!("{base}/{namespace}/{path}"),
        None => format!("{base}/{namespace}"),
    }
}
