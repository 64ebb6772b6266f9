use msc_client::model::auth::{AccountType, BankAccount, Credential, CredentialPool, Secret};

#[test]
fn test_credential_normalizes_document() {
    let credential = Credential::new("20.299.078/0001-66", "user", "pass").unwrap();
    assert_eq!(credential.document, "20299078000166");
    assert!(credential.key.is_none());
}

#[test]
fn test_credentials_with_same_secrets_share_cache_key() {
    let a = Credential::new("20299078000166", "user", "pass").unwrap();
    let b = Credential::new("11222333000181", "user", "pass")
        .unwrap()
        .with_key("other");
    assert_eq!(a.cache_key(), b.cache_key());
}

#[test]
fn test_cache_key_debug_does_not_leak_secret() {
    let credential = Credential::new("20299078000166", "user", "s3cr3t-pass").unwrap();
    let printed = format!("{:?}", credential.cache_key());
    assert!(printed.starts_with("CredentialKey("));
    assert!(!printed.contains("s3cr3t"));
}

#[test]
fn test_secret_display_is_redacted() {
    let secret = Secret::new("token-value");
    assert_eq!(secret.to_string(), "****");
    assert_eq!(secret.expose(), "token-value");
}

#[test]
fn test_bank_account_deserializes_with_default_document_type() {
    let account: BankAccount = serde_json::from_str(
        r#"{
            "branch": "0001",
            "account": "12345",
            "accountDigit": "6",
            "accountType": "PP",
            "ispb": "00000000",
            "documentNumber": "20299078000166"
        }"#,
    )
    .unwrap();
    assert_eq!(account.document_type, "CNPJ");
    assert_eq!(account.account_type, AccountType::Savings);
}

#[test]
fn test_pool_with_bank_account() {
    let account: BankAccount = serde_json::from_value(serde_json::json!({
        "branch": "0001",
        "account": "12345",
        "accountDigit": "6",
        "accountType": "CC",
        "ispb": "00000000",
        "documentNumber": "20299078000166"
    }))
    .unwrap();

    let mut pool = CredentialPool::new();
    assert!(pool.is_empty());
    pool.add(
        "acme",
        Credential::new("20299078000166", "user", "pass")
            .unwrap()
            .with_bank_account(account.clone()),
    );

    let stored = pool.get_by_key("acme").unwrap();
    assert_eq!(stored.key.as_deref(), Some("acme"));
    assert_eq!(stored.bank_account.as_ref(), Some(&account));
}
