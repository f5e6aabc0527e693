mod common;

use engine::{
    Account, AccountCmd, AccountKind, CategoryCmd, CategoryKind, Engine, EngineError,
    TransactionCmd, TransactionKind, TransactionListFilter, User,
};

use common::{date, dec, engine_with_users};

async fn accounts(engine: &Engine, user: &User) -> (Account, Account) {
    let checking = engine
        .create_account(
            AccountCmd::new("Checking", AccountKind::Checking, dec("1000")),
            user.id,
        )
        .await
        .unwrap();
    let savings = engine
        .create_account(
            AccountCmd::new("Savings", AccountKind::Savings, dec("0")),
            user.id,
        )
        .await
        .unwrap();
    (checking, savings)
}

#[tokio::test]
async fn create_and_fetch_expense() {
    let (engine, alice, bob) = engine_with_users().await;
    let (checking, _savings) = accounts(&engine, &alice).await;
    let food = engine
        .create_category(CategoryCmd::new("Food", CategoryKind::Expense), alice.id)
        .await
        .unwrap();

    let tx = engine
        .create_transaction(
            TransactionCmd::new(
                TransactionKind::Expense,
                checking.id,
                dec("12.30"),
                date(2024, 5, 4),
                " Lunch ",
            )
            .category(food.id)
            .notes("with team"),
            alice.id,
        )
        .await
        .unwrap();
    assert_eq!(tx.description, "Lunch");
    assert_eq!(tx.amount.to_string(), "12.30");
    assert_eq!(tx.category_id, Some(food.id));

    assert_eq!(engine.transaction(tx.id, alice.id).await.unwrap(), tx);
    assert!(matches!(
        engine.transaction(tx.id, bob.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn references_must_belong_to_caller() {
    let (engine, alice, bob) = engine_with_users().await;
    let (checking, _) = accounts(&engine, &alice).await;
    let (bob_checking, _) = accounts(&engine, &bob).await;
    let bob_category = engine
        .create_category(CategoryCmd::new("Bob", CategoryKind::Expense), bob.id)
        .await
        .unwrap();

    let err = engine
        .create_transaction(
            TransactionCmd::new(
                TransactionKind::Income,
                bob_checking.id,
                dec("1"),
                date(2024, 1, 1),
                "salary",
            ),
            alice.id,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let err = engine
        .create_transaction(
            TransactionCmd::transfer(checking.id, bob_checking.id, dec("1"), date(2024, 1, 1), "x"),
            alice.id,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let err = engine
        .create_transaction(
            TransactionCmd::new(
                TransactionKind::Expense,
                checking.id,
                dec("1"),
                date(2024, 1, 1),
                "x",
            )
            .category(bob_category.id),
            alice.id,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn amount_and_transfer_rules() {
    let (engine, alice, _bob) = engine_with_users().await;
    let (checking, _) = accounts(&engine, &alice).await;

    for amount in ["0", "-5", "1.234"] {
        let err = engine
            .create_transaction(
                TransactionCmd::new(
                    TransactionKind::Expense,
                    checking.id,
                    dec(amount),
                    date(2024, 1, 1),
                    "bad",
                ),
                alice.id,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)), "{amount}");
    }

    let err = engine
        .create_transaction(
            TransactionCmd::transfer(checking.id, checking.id, dec("1"), date(2024, 1, 1), "loop"),
            alice.id,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidReference(_)));
}

#[tokio::test]
async fn list_order_and_filters() {
    let (engine, alice, bob) = engine_with_users().await;
    let (checking, savings) = accounts(&engine, &alice).await;
    let food = engine
        .create_category(CategoryCmd::new("Food", CategoryKind::Expense), alice.id)
        .await
        .unwrap();

    let older = engine
        .create_transaction(
            TransactionCmd::new(
                TransactionKind::Income,
                checking.id,
                dec("500"),
                date(2024, 1, 1),
                "salary",
            ),
            alice.id,
        )
        .await
        .unwrap();
    let first_same_day = engine
        .create_transaction(
            TransactionCmd::new(
                TransactionKind::Expense,
                checking.id,
                dec("10"),
                date(2024, 1, 10),
                "breakfast",
            )
            .category(food.id),
            alice.id,
        )
        .await
        .unwrap();
    let second_same_day = engine
        .create_transaction(
            TransactionCmd::transfer(checking.id, savings.id, dec("100"), date(2024, 1, 10), "save"),
            alice.id,
        )
        .await
        .unwrap();
    let newest = engine
        .create_transaction(
            TransactionCmd::new(
                TransactionKind::Expense,
                checking.id,
                dec("20"),
                date(2024, 2, 1),
                "dinner",
            )
            .category(food.id),
            alice.id,
        )
        .await
        .unwrap();

    let all = engine
        .transactions(&TransactionListFilter::default(), alice.id)
        .await
        .unwrap();
    let ids: Vec<_> = all.iter().map(|t| t.id).collect();
    assert_eq!(
        ids,
        vec![newest.id, second_same_day.id, first_same_day.id, older.id]
    );
    assert!(
        engine
            .transactions(&TransactionListFilter::default(), bob.id)
            .await
            .unwrap()
            .is_empty()
    );

    let expenses = engine
        .transactions(
            &TransactionListFilter {
                kind: Some(TransactionKind::Expense),
                ..Default::default()
            },
            alice.id,
        )
        .await
        .unwrap();
    assert_eq!(expenses.len(), 2);

    let by_category = engine
        .transactions(
            &TransactionListFilter {
                kind: Some(TransactionKind::Expense),
                category_id: Some(food.id),
                ..Default::default()
            },
            alice.id,
        )
        .await
        .unwrap();
    assert_eq!(by_category.len(), 2);

    // The transfer shows up on both sides.
    let savings_side = engine
        .transactions(
            &TransactionListFilter {
                account_id: Some(savings.id),
                ..Default::default()
            },
            alice.id,
        )
        .await
        .unwrap();
    assert_eq!(savings_side.len(), 1);
    assert_eq!(savings_side[0].id, second_same_day.id);

    let january = engine
        .transactions(
            &TransactionListFilter {
                from: Some(date(2024, 1, 1)),
                to: Some(date(2024, 1, 10)),
                ..Default::default()
            },
            alice.id,
        )
        .await
        .unwrap();
    assert_eq!(january.len(), 3);

    let reversed = engine
        .transactions(
            &TransactionListFilter {
                from: Some(date(2024, 2, 1)),
                to: Some(date(2024, 1, 1)),
                ..Default::default()
            },
            alice.id,
        )
        .await;
    assert!(matches!(reversed, Err(EngineError::InvalidDate(_))));
}

#[tokio::test]
async fn update_replaces_fields_and_delete_removes() {
    let (engine, alice, bob) = engine_with_users().await;
    let (checking, savings) = accounts(&engine, &alice).await;

    let tx = engine
        .create_transaction(
            TransactionCmd::transfer(checking.id, savings.id, dec("100"), date(2024, 1, 10), "save")
                .notes("monthly"),
            alice.id,
        )
        .await
        .unwrap();

    let updated = engine
        .update_transaction(
            tx.id,
            TransactionCmd::new(
                TransactionKind::Expense,
                savings.id,
                dec("99.99"),
                date(2024, 1, 11),
                "oops",
            ),
            alice.id,
        )
        .await
        .unwrap();
    assert_eq!(updated.kind, TransactionKind::Expense);
    assert_eq!(updated.account_id, savings.id);
    assert_eq!(updated.target_account_id, None);
    assert_eq!(updated.notes, None);
    assert_eq!(updated.date, date(2024, 1, 11));

    assert!(matches!(
        engine.delete_transaction(tx.id, bob.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    engine.delete_transaction(tx.id, alice.id).await.unwrap();
    assert!(matches!(
        engine.transaction(tx.id, alice.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
}
