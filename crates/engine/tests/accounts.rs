mod common;

use engine::{
    AccountCmd, AccountKind, AccountListFilter, EngineError, TransactionCmd, TransactionKind,
};

use common::{date, dec, engine_with_users, missing};

#[tokio::test]
async fn create_applies_defaults() {
    let (engine, alice, _bob) = engine_with_users().await;

    let account = engine
        .create_account(
            AccountCmd::new("  Wallet ", AccountKind::Cash, dec("100")),
            alice.id,
        )
        .await
        .unwrap();

    assert_eq!(account.name, "Wallet");
    assert_eq!(account.user_id, alice.id);
    assert_eq!(account.currency, "KRW");
    assert!(account.is_active);
    assert_eq!(account.balance.to_string(), "100.00");
}

#[tokio::test]
async fn balance_keeps_exact_cents() {
    let (engine, alice, _bob) = engine_with_users().await;

    let account = engine
        .create_account(
            AccountCmd::new("Bank", AccountKind::Bank, dec("1234567.89")),
            alice.id,
        )
        .await
        .unwrap();
    let fetched = engine.account(account.id, alice.id).await.unwrap();
    assert_eq!(fetched.balance, dec("1234567.89"));

    let err = engine
        .create_account(AccountCmd::new("Bad", AccountKind::Bank, dec("1.005")), alice.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn other_users_account_is_not_found() {
    let (engine, alice, bob) = engine_with_users().await;

    let account = engine
        .create_account(AccountCmd::new("Mine", AccountKind::Cash, dec("0")), alice.id)
        .await
        .unwrap();

    let err = engine.account(account.id, bob.id).await.unwrap_err();
    let absent = engine.account(missing(), bob.id).await.unwrap_err();
    assert_eq!(err, absent);

    assert!(matches!(
        engine
            .update_account(
                account.id,
                AccountCmd::new("Stolen", AccountKind::Cash, dec("0")),
                bob.id
            )
            .await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.delete_account(account.id, bob.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(engine.account(account.id, alice.id).await.is_ok());
}

#[tokio::test]
async fn update_replaces_every_field() {
    let (engine, alice, _bob) = engine_with_users().await;

    let account = engine
        .create_account(
            AccountCmd::new("Card", AccountKind::Card, dec("10"))
                .currency("usd")
                .description("travel card")
                .active(false),
            alice.id,
        )
        .await
        .unwrap();
    assert_eq!(account.currency, "USD");
    assert!(!account.is_active);

    let updated = engine
        .update_account(
            account.id,
            AccountCmd::new("Card", AccountKind::CreditCard, dec("10")),
            alice.id,
        )
        .await
        .unwrap();
    assert_eq!(updated.kind, AccountKind::CreditCard);
    assert_eq!(updated.description, None);
    assert_eq!(updated.currency, "KRW");
    assert!(updated.is_active);
    assert_eq!(updated.created_at, account.created_at);
    assert!(updated.updated_at >= account.updated_at);
}

#[tokio::test]
async fn list_filters_by_kind_and_flag() {
    let (engine, alice, bob) = engine_with_users().await;

    for (name, kind, active) in [
        ("b-savings", AccountKind::Savings, true),
        ("a-cash", AccountKind::Cash, true),
        ("c-old", AccountKind::Cash, false),
    ] {
        engine
            .create_account(
                AccountCmd::new(name, kind, dec("0")).active(active),
                alice.id,
            )
            .await
            .unwrap();
    }
    engine
        .create_account(AccountCmd::new("bob-cash", AccountKind::Cash, dec("0")), bob.id)
        .await
        .unwrap();

    let all = engine
        .accounts(&AccountListFilter::default(), alice.id)
        .await
        .unwrap();
    let names: Vec<_> = all.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["a-cash", "b-savings", "c-old"]);

    let cash = engine
        .accounts(
            &AccountListFilter {
                kind: Some(AccountKind::Cash),
                ..Default::default()
            },
            alice.id,
        )
        .await
        .unwrap();
    assert_eq!(cash.len(), 2);

    let inactive = engine
        .accounts(
            &AccountListFilter {
                active: Some(false),
                ..Default::default()
            },
            alice.id,
        )
        .await
        .unwrap();
    assert_eq!(inactive.len(), 1);
    assert_eq!(inactive[0].name, "c-old");
}

#[tokio::test]
async fn balance_changes_only_explicitly() {
    let (engine, alice, _bob) = engine_with_users().await;

    let account = engine
        .create_account(AccountCmd::new("Main", AccountKind::Checking, dec("50.00")), alice.id)
        .await
        .unwrap();
    engine
        .create_transaction(
            TransactionCmd::new(
                TransactionKind::Expense,
                account.id,
                dec("20.00"),
                date(2024, 1, 5),
                "groceries",
            ),
            alice.id,
        )
        .await
        .unwrap();
    assert_eq!(
        engine.account(account.id, alice.id).await.unwrap().balance,
        dec("50.00")
    );

    let updated = engine
        .update_account_balance(account.id, dec("-12.5"), alice.id)
        .await
        .unwrap();
    assert_eq!(updated.balance.to_string(), "-12.50");
}

#[tokio::test]
async fn referenced_account_cannot_be_deleted() {
    let (engine, alice, _bob) = engine_with_users().await;

    let from = engine
        .create_account(AccountCmd::new("From", AccountKind::Bank, dec("0")), alice.id)
        .await
        .unwrap();
    let to = engine
        .create_account(AccountCmd::new("To", AccountKind::Savings, dec("0")), alice.id)
        .await
        .unwrap();
    let tx = engine
        .create_transaction(
            TransactionCmd::transfer(from.id, to.id, dec("5"), date(2024, 2, 1), "move"),
            alice.id,
        )
        .await
        .unwrap();

    assert!(matches!(
        engine.delete_account(to.id, alice.id).await,
        Err(EngineError::InUse(_))
    ));

    engine.delete_transaction(tx.id, alice.id).await.unwrap();
    engine.delete_account(to.id, alice.id).await.unwrap();
    assert!(matches!(
        engine.account(to.id, alice.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
}
