/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Credentials, secrets and access tokens

use crate::error::AppError;
use crate::utils::cnpj::validate_cnpj;
use pretty_simple_display::{DebugPretty, DisplaySimple};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A secret string that never shows up in `Debug` or `Display` output
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Wraps a secret value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the secret value
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// `true` when the secret is empty or blank
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret(****)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "****")
    }
}

/// Access token issued by the authentication endpoint
pub type AccessToken = Secret;

/// Body returned by the token endpoint
#[derive(Deserialize)]
pub struct TokenResponse {
    /// Bearer token used by every resource call
    pub access_token: String,
}

/// Type of a bank account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    /// Conta corrente
    #[serde(rename = "CC")]
    Checking,
    /// Conta de depósito
    #[serde(rename = "CD")]
    Deposit,
    /// Conta garantida
    #[serde(rename = "CG")]
    Guaranteed,
    /// Conta de investimento
    #[serde(rename = "CI")]
    Investment,
    /// Conta de pagamento
    #[serde(rename = "PG")]
    Payment,
    /// Poupança
    #[serde(rename = "PP")]
    Savings,
}

fn default_document_type() -> String {
    "CNPJ".to_string()
}

#[derive(DebugPretty, DisplaySimple, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Bank account receiving settlements
pub struct BankAccount {
    /// Branch number
    pub branch: String,
    /// Account number
    pub account: String,
    /// Account check digit
    pub account_digit: String,
    /// Account type
    pub account_type: AccountType,
    /// ISPB code of the bank
    pub ispb: String,
    /// Type of the holder's document
    #[serde(default = "default_document_type")]
    pub document_type: String,
    /// Holder's document number
    pub document_number: String,
}

/// Digest of an API user and password, used to key cached tokens
///
/// Equal secrets give equal keys regardless of which [`Credential`] instance
/// carries them. The raw secrets are not retained.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CredentialKey([u8; 32]);

impl CredentialKey {
    /// Derives the key of an API user and password
    #[must_use]
    pub fn derive(api_user: &Secret, api_pass: &Secret) -> Self {
        let mut hasher = Sha256::new();
        // length prefix keeps ("ab", "c") and ("a", "bc") apart
        hasher.update((api_user.expose().len() as u64).to_le_bytes());
        hasher.update(api_user.expose().as_bytes());
        hasher.update(api_pass.expose().as_bytes());
        Self(hasher.finalize().into())
    }
}

impl fmt::Debug for CredentialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CredentialKey(")?;
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "..)")
    }
}

/// Credential of an API user
#[derive(Debug, Clone)]
pub struct Credential {
    /// Optional name of the credential inside a [`CredentialPool`]
    pub key: Option<String>,
    /// CNPJ of the customer, normalized to 14 digits
    pub document: String,
    /// Bank account of the customer
    pub bank_account: Option<BankAccount>,
    /// API user
    pub api_user: Secret,
    /// API password
    pub api_pass: Secret,
}

impl Credential {
    /// Creates a credential, validating the document and the secrets
    ///
    /// # Errors
    /// [`AppError::InvalidInput`] when the user or password is blank or the
    /// document is not a valid CNPJ.
    pub fn new(document: &str, api_user: &str, api_pass: &str) -> Result<Self, AppError> {
        let api_user = Secret::new(api_user);
        let api_pass = Secret::new(api_pass);
        if api_user.is_blank() {
            return Err(AppError::InvalidInput("api_user cannot be empty".into()));
        }
        if api_pass.is_blank() {
            return Err(AppError::InvalidInput("api_pass cannot be empty".into()));
        }
        Ok(Self {
            key: None,
            document: validate_cnpj(document)?,
            bank_account: None,
            api_user,
            api_pass,
        })
    }

    /// Sets the pool key
    #[must_use]
    pub fn with_key(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }

    /// Sets the bank account
    #[must_use]
    pub fn with_bank_account(mut self, bank_account: BankAccount) -> Self {
        self.bank_account = Some(bank_account);
        self
    }

    /// Token cache key of this credential
    #[must_use]
    pub fn cache_key(&self) -> CredentialKey {
        CredentialKey::derive(&self.api_user, &self.api_pass)
    }
}

/// Set of credentials addressable by key
#[derive(Debug, Clone, Default)]
pub struct CredentialPool {
    pool: Vec<Credential>,
}

impl CredentialPool {
    /// Creates an empty pool
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a credential under `key`, replacing any credential with that key
    pub fn add(&mut self, key: &str, credential: Credential) {
        let credential = credential.with_key(key);
        self.pool.retain(|c| c.key.as_deref() != Some(key));
        self.pool.push(credential);
    }

    /// Looks a credential up by key
    #[must_use]
    pub fn get_by_key(&self, key: &str) -> Option<&Credential> {
        self.pool.iter().find(|c| c.key.as_deref() == Some(key))
    }

    /// Number of credentials
    #[must_use]
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    /// `true` when the pool holds no credential
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }
}
