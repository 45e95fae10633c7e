use std::{borrow::Cow, env, process};

use splitbook_application::LedgerService;
use splitbook_domain::{GroupId, PersonId};
use splitbook_infrastructure::{AppConfig, JsonWinningNumbersFeed, LedgerSnapshot};
use splitbook_presentation::{
    CommandPresenter, FundPresenter, InvoicePresenter, PersonalLedgerPresenter, SettlementPresenter,
    format_ledger_error,
};

type CliResult<T> = Result<T, Cow<'static, str>>;

fn main() {
    tracing_subscriber::fmt::init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> CliResult<()> {
    let Some(path) = env::args().nth(1) else {
        return Err("Usage: splitbook <ledger.json>".into());
    };

    let config = AppConfig::from_env().map_err(|err| err.to_string())?;
    let snapshot = LedgerSnapshot::load(&path).map_err(|err| err.to_string())?;

    let groups: Vec<GroupId> = snapshot.groups.iter().map(|group| group.id.clone()).collect();
    let mut owners: Vec<PersonId> = Vec::new();
    for entry in &snapshot.personal {
        if !owners.contains(&entry.owner) {
            owners.push(entry.owner.clone());
        }
    }

    let (store, directory) = snapshot.into_stores().map_err(|err| err.to_string())?;
    let feed = match &config.winning_numbers_path {
        Some(path) => JsonWinningNumbersFeed::load(path).map_err(|err| err.to_string())?,
        None => JsonWinningNumbersFeed::default(),
    };
    tracing::debug!(
        groups = groups.len(),
        owners = owners.len(),
        draws = feed.periods().len(),
        "Ledger ready"
    );

    let service = LedgerService::new(&store, &directory, &feed, config.settlement);
    print_groups(&service, &groups);
    print_personal(&service, &owners);
    Ok(())
}

fn print_groups(service: &LedgerService<'_>, groups: &[GroupId]) {
    for group in groups {
        match service.group_members(group) {
            Ok(Some(members)) => {
                println!("{}\n", CommandPresenter::group_members(group, Some(&members)));
            }
            Ok(None) => {}
            Err(err) => eprintln!("{}", format_ledger_error(&err, format!("[{group}]"))),
        }
        match service.group_report(group) {
            Ok(report) => println!("{}\n", SettlementPresenter::render(&report)),
            Err(err) => eprintln!("{}", format_ledger_error(&err, format!("[{group}]"))),
        }
        match service.fund_report(group) {
            Ok(report) if !report.history.is_empty() => {
                println!("{}\n", FundPresenter::render(&report));
                println!("{}", FundPresenter::render_history(&report));
            }
            Ok(_) => {}
            Err(err) => eprintln!("{}", format_ledger_error(&err, format!("[{group}]"))),
        }
    }
}

fn print_personal(service: &LedgerService<'_>, owners: &[PersonId]) {
    for owner in owners {
        match service.personal_ledger(owner) {
            Ok(ledger) => println!("{}\n", PersonalLedgerPresenter::render(&ledger)),
            Err(err) => eprintln!("{}", format_ledger_error(&err, format!("[{owner}]"))),
        }
        match service.check_invoices(owner) {
            Ok(checks) if !checks.is_empty() => {
                println!("{}\n", InvoicePresenter::render(owner, &checks));
            }
            Ok(_) => {}
            Err(err) => eprintln!("{}", format_ledger_error(&err, format!("[{owner}]"))),
        }
    }
}
