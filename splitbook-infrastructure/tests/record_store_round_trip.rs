use chrono::NaiveDate;
use rstest::rstest;
use splitbook_application::{GroupExpenseRequest, LedgerService, RecordStore};
use splitbook_domain::{
    Adjustments, Expense, FundEntry, FundKind, GroupId, Money, PersonId, PersonalEntry, Record,
    Scope, SettlementContext,
};
use splitbook_infrastructure::{InMemoryGroupDirectory, InMemoryRecordStore, JsonWinningNumbersFeed};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 25).expect("valid date")
}

fn personal() -> (Scope, Record) {
    let owner = PersonId::from("小明");
    (
        Scope::Personal(owner.clone()),
        Record::Personal(PersonalEntry {
            owner,
            item: "bubble tea".to_string(),
            amount: Money::from_i64(65),
            date: date(),
            invoice_number: None,
        }),
    )
}

fn expense() -> (Scope, Record) {
    (
        Scope::Group(GroupId::from("trip")),
        Record::Expense(Expense {
            payer: PersonId::from("A"),
            total: Money::from_i64(300),
            shares: [
                (PersonId::from("A"), Money::from_i64(150)),
                (PersonId::from("B"), Money::from_i64(150)),
            ]
            .into_iter()
            .collect(),
            memo: "dinner".to_string(),
            date: date(),
            invoice_number: None,
        }),
    )
}

fn fund() -> (Scope, Record) {
    (
        Scope::Group(GroupId::from("trip")),
        Record::Fund(FundEntry {
            member: PersonId::from("B"),
            amount: Money::from_i64(500),
            kind: FundKind::TopUp,
            date: date(),
        }),
    )
}

#[rstest]
#[case::personal(personal())]
#[case::expense(expense())]
#[case::fund(fund())]
fn appended_record_is_returned_unchanged(#[case] input: (Scope, Record)) {
    let (scope, record) = input;
    let store = InMemoryRecordStore::new();

    store.append(&scope, record.clone()).expect("append");

    assert!(store.records(&scope).expect("records").contains(&record));
}

#[test]
fn service_writes_are_visible_through_the_store() {
    let store = InMemoryRecordStore::new();
    let directory = InMemoryGroupDirectory::new();
    let feed = JsonWinningNumbersFeed::default();
    let service = LedgerService::new(&store, &directory, &feed, SettlementContext::default());
    let trip = GroupId::from("trip");

    let recorded = service
        .record_group_expense(
            &trip,
            GroupExpenseRequest {
                payer: PersonId::from("A"),
                total: Money::from_i64(300),
                participants: vec![PersonId::from("A"), PersonId::from("B")],
                adjustments: Adjustments::new(),
                memo: "dinner".to_string(),
                date: date(),
                invoice_number: None,
            },
        )
        .expect("record expense");

    let stored = store.records(&Scope::Group(trip.clone())).expect("records");
    assert_eq!(stored, vec![Record::Expense(recorded)]);

    let report = service.group_report(&trip).expect("report");
    assert_eq!(
        report.balances,
        vec![
            (PersonId::from("A"), Money::from_i64(150)),
            (PersonId::from("B"), Money::from_i64(-150)),
        ]
    );
}
