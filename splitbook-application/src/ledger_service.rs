use std::collections::{BTreeMap, btree_map::Entry};

use chrono::NaiveDate;
use splitbook_domain::{
    BalanceCalculator, Expense, ExpenseSplitter, FundEntry, FundKind, GroupId, InvoiceNumber,
    InvoicePeriod, LotteryMatcher, Money, PersonId, PersonalEntry, PrizeTable, Record, Scope,
    SettlementContext, TransferPlanner, WinningNumbers, quantize_balances,
    services::{fund_balances, suggest_top_ups},
};

use crate::{
    error::{LedgerError, MalformedCommand},
    model::{
        FundReport, GroupExpenseRequest, GroupReport, InvoiceCheck, InvoiceOutcome,
        ItemizedExpenseRequest, PersonalLedger,
    },
    ports::{GroupDirectory, RecordStore, StoreError, WinningNumbersFeed},
};

/// Every user-facing ledger operation, over injected persistence and feeds.
pub struct LedgerService<'a> {
    store: &'a dyn RecordStore,
    directory: &'a dyn GroupDirectory,
    feed: &'a dyn WinningNumbersFeed,
    context: SettlementContext,
    matcher: LotteryMatcher,
}

impl<'a> LedgerService<'a> {
    pub fn new(
        store: &'a dyn RecordStore,
        directory: &'a dyn GroupDirectory,
        feed: &'a dyn WinningNumbersFeed,
        context: SettlementContext,
    ) -> Self {
        Self {
            store,
            directory,
            feed,
            context,
            matcher: LotteryMatcher::official(),
        }
    }

    pub fn with_prize_table(mut self, table: PrizeTable) -> Self {
        self.matcher = LotteryMatcher::new(table);
        self
    }

    pub fn context(&self) -> SettlementContext {
        self.context
    }

    // ---- personal ledger ----

    pub fn record_personal(
        &self,
        owner: &PersonId,
        item: &str,
        amount: Money,
        date: NaiveDate,
        invoice_number: Option<&str>,
    ) -> Result<PersonalEntry, LedgerError> {
        let entry = PersonalEntry {
            owner: owner.clone(),
            item: item.trim().to_string(),
            amount,
            date,
            invoice_number: parse_invoice_number(invoice_number)?,
        };
        self.append(&Scope::Personal(owner.clone()), Record::Personal(entry.clone()))?;
        tracing::info!(
            owner = %owner,
            amount = %amount,
            has_invoice = entry.invoice_number.is_some(),
            "Personal entry recorded"
        );
        Ok(entry)
    }

    pub fn personal_ledger(&self, owner: &PersonId) -> Result<PersonalLedger, LedgerError> {
        let entries: Vec<PersonalEntry> = self
            .records(&Scope::Personal(owner.clone()))?
            .into_iter()
            .filter_map(|record| match record {
                Record::Personal(entry) if &entry.owner == owner => Some(entry),
                _ => None,
            })
            .collect();
        let total = entries.iter().map(|entry| entry.amount).sum();
        Ok(PersonalLedger {
            owner: owner.clone(),
            entries,
            total,
        })
    }

    /// Deletes the entries at the given 1-based positions of the owner's
    /// ledger. Nothing is deleted unless every position exists. Deletes are
    /// separate store calls, so a store failure midway keeps the deletes
    /// already made.
    pub fn delete_personal(
        &self,
        owner: &PersonId,
        positions: &[usize],
    ) -> Result<Vec<PersonalEntry>, LedgerError> {
        let deleted = self.delete_positions(&Scope::Personal(owner.clone()), positions, |record| {
            matches!(record, Record::Personal(entry) if &entry.owner == owner)
        })?;
        Ok(deleted
            .into_iter()
            .filter_map(|record| match record {
                Record::Personal(entry) => Some(entry),
                _ => None,
            })
            .collect())
    }

    pub fn reset_personal(&self, owner: &PersonId) -> Result<usize, LedgerError> {
        self.reset(&Scope::Personal(owner.clone()))
    }

    // ---- group expenses ----

    pub fn record_group_expense(
        &self,
        group: &GroupId,
        request: GroupExpenseRequest,
    ) -> Result<Expense, LedgerError> {
        let splitter = ExpenseSplitter::new(self.context);
        let shares = splitter
            .split_even(request.total, &request.participants, &request.adjustments)
            .inspect_err(|err| {
                tracing::warn!(
                    group = %group,
                    reject_reason = "invalid_split",
                    error = %err,
                    "Group expense rejected"
                );
            })?;

        let expense = Expense {
            payer: request.payer,
            total: request.total,
            shares,
            memo: request.memo.trim().to_string(),
            date: request.date,
            invoice_number: parse_invoice_number(request.invoice_number.as_deref())?,
        };
        self.append(&Scope::Group(group.clone()), Record::Expense(expense.clone()))?;
        tracing::info!(
            group = %group,
            payer = %expense.payer,
            total = %expense.total,
            participant_count = expense.shares.len(),
            "Group expense recorded"
        );
        Ok(expense)
    }

    pub fn record_itemized_expense(
        &self,
        group: &GroupId,
        request: ItemizedExpenseRequest,
    ) -> Result<Expense, LedgerError> {
        let (total, shares) = ExpenseSplitter::new(self.context)
            .itemized(request.items)
            .inspect_err(|err| {
                tracing::warn!(
                    group = %group,
                    reject_reason = "invalid_items",
                    error = %err,
                    "Itemized expense rejected"
                );
            })?;

        let expense = Expense {
            payer: request.payer,
            total,
            shares,
            memo: request.memo.trim().to_string(),
            date: request.date,
            invoice_number: parse_invoice_number(request.invoice_number.as_deref())?,
        };
        self.append(&Scope::Group(group.clone()), Record::Expense(expense.clone()))?;
        tracing::info!(
            group = %group,
            payer = %expense.payer,
            total = %expense.total,
            participant_count = expense.shares.len(),
            "Itemized expense recorded"
        );
        Ok(expense)
    }

    /// Positions refer to the expense list of `group_report`.
    pub fn delete_group(
        &self,
        group: &GroupId,
        positions: &[usize],
    ) -> Result<Vec<Expense>, LedgerError> {
        let deleted = self.delete_positions(&Scope::Group(group.clone()), positions, |record| {
            matches!(record, Record::Expense(_))
        })?;
        Ok(deleted
            .into_iter()
            .filter_map(|record| match record {
                Record::Expense(expense) => Some(expense),
                _ => None,
            })
            .collect())
    }

    /// Deletes every expense of `group` on `date` with the given memo.
    pub fn delete_group_meal(
        &self,
        group: &GroupId,
        date: NaiveDate,
        memo: &str,
    ) -> Result<usize, LedgerError> {
        let scope = Scope::Group(group.clone());
        let memo = memo.trim();
        let indexes: Vec<usize> = self
            .records(&scope)?
            .iter()
            .enumerate()
            .filter(|(_, record)| {
                matches!(record, Record::Expense(expense) if expense.date == date && expense.memo == memo)
            })
            .map(|(index, _)| index)
            .collect();

        let mut deleted = 0usize;
        for &index in indexes.iter().rev() {
            if self.store.delete(&scope, index).map_err(|err| self.store_failure(&scope, err))? {
                deleted += 1;
            }
        }
        tracing::info!(group = %group, %date, memo, deleted, "Group meal deleted");
        Ok(deleted)
    }

    pub fn reset_group(&self, group: &GroupId) -> Result<usize, LedgerError> {
        self.reset(&Scope::Group(group.clone()))
    }

    pub fn group_report(&self, group: &GroupId) -> Result<GroupReport, LedgerError> {
        let scope = Scope::Group(group.clone());
        let expenses: Vec<Expense> = self
            .records(&scope)?
            .into_iter()
            .filter_map(|record| match record {
                Record::Expense(expense) => Some(expense),
                _ => None,
            })
            .collect();
        for expense in &expenses {
            expense.validate().map_err(|err| {
                self.store_failure(&scope, StoreError::Corrupt(err.to_string()))
            })?;
        }

        let exact = BalanceCalculator.calculate(&expenses);
        let quantized = quantize_balances(&exact, self.context)?;
        let transfers = TransferPlanner.plan(&quantized)?;

        let mut balances: Vec<(PersonId, Money)> = quantized.into_iter().collect();
        balances.sort_by(|(a, _), (b, _)| a.cmp(b));

        tracing::debug!(
            group = %group,
            expense_count = expenses.len(),
            member_count = balances.len(),
            transfer_count = transfers.len(),
            "Group report built"
        );
        Ok(GroupReport {
            group: group.clone(),
            expenses,
            balances,
            transfers,
        })
    }

    // ---- groups and the shared fund ----

    /// `Ok(false)` when the group already exists.
    pub fn create_group(
        &self,
        group: &GroupId,
        members: &[PersonId],
    ) -> Result<bool, LedgerError> {
        let mut unique: Vec<PersonId> = Vec::with_capacity(members.len());
        for member in members.iter().filter(|member| !member.is_empty()) {
            if !unique.contains(member) {
                unique.push(member.clone());
            }
        }
        if unique.is_empty() {
            return Err(MalformedCommand::NoMembers.into());
        }

        let created = self
            .directory
            .create_group(group, &unique)
            .map_err(LedgerError::directory)?;
        tracing::info!(group = %group, member_count = unique.len(), created, "Group registration");
        Ok(created)
    }

    pub fn group_members(&self, group: &GroupId) -> Result<Option<Vec<PersonId>>, LedgerError> {
        self.directory.members(group).map_err(LedgerError::directory)
    }

    pub fn top_up_fund(
        &self,
        group: &GroupId,
        amounts: &[(PersonId, Money)],
        date: NaiveDate,
    ) -> Result<Vec<FundEntry>, LedgerError> {
        self.record_fund(group, amounts, date, FundKind::TopUp)
    }

    pub fn deduct_fund(
        &self,
        group: &GroupId,
        amounts: &[(PersonId, Money)],
        date: NaiveDate,
    ) -> Result<Vec<FundEntry>, LedgerError> {
        self.record_fund(group, amounts, date, FundKind::Deduct)
    }

    pub fn fund_report(&self, group: &GroupId) -> Result<FundReport, LedgerError> {
        let history: Vec<FundEntry> = self
            .records(&Scope::Group(group.clone()))?
            .into_iter()
            .filter_map(|record| match record {
                Record::Fund(entry) => Some(entry),
                _ => None,
            })
            .collect();

        let members = match self.group_members(group)? {
            Some(members) if !members.is_empty() => members,
            _ => {
                let mut seen: Vec<PersonId> = Vec::new();
                for entry in &history {
                    if !seen.contains(&entry.member) {
                        seen.push(entry.member.clone());
                    }
                }
                seen
            }
        };

        let balances = fund_balances(&history);
        let contributions: Vec<(PersonId, Money)> = members
            .iter()
            .map(|member| {
                let amount = balances.get(member).copied().unwrap_or(Money::ZERO);
                (member.clone(), amount)
            })
            .collect();
        let total = contributions.iter().map(|(_, amount)| *amount).sum();
        let top_ups = suggest_top_ups(&balances, &members, self.context);

        Ok(FundReport {
            group: group.clone(),
            history,
            contributions,
            total,
            top_ups,
        })
    }

    // ---- invoice lottery ----

    /// Checks every personal entry that carries an invoice number against the
    /// draw of the period its date falls in.
    pub fn check_invoices(&self, owner: &PersonId) -> Result<Vec<InvoiceCheck>, LedgerError> {
        let ledger = self.personal_ledger(owner)?;
        let mut draws: BTreeMap<InvoicePeriod, Option<WinningNumbers>> = BTreeMap::new();
        let mut checks = Vec::new();

        for entry in ledger.entries {
            let Some(invoice_number) = entry.invoice_number.clone() else {
                continue;
            };
            let period = InvoicePeriod::containing(entry.date);
            let winning = match draws.entry(period) {
                Entry::Occupied(slot) => slot.into_mut(),
                Entry::Vacant(slot) => slot.insert(self.fetch_winning_numbers(period)?),
            };
            let outcome = self.outcome(&invoice_number, winning.as_ref());
            checks.push(InvoiceCheck {
                entry,
                invoice_number,
                period,
                outcome,
            });
        }

        tracing::debug!(
            owner = %owner,
            checked = checks.len(),
            won = checks
                .iter()
                .filter(|check| matches!(check.outcome, InvoiceOutcome::Won(_)))
                .count(),
            "Invoices checked"
        );
        Ok(checks)
    }

    pub fn check_invoice(
        &self,
        invoice_number: &str,
        period: InvoicePeriod,
    ) -> Result<InvoiceOutcome, LedgerError> {
        let invoice_number = InvoiceNumber::parse(invoice_number)?;
        let winning = self.fetch_winning_numbers(period)?;
        Ok(self.outcome(&invoice_number, winning.as_ref()))
    }

    // ---- helpers ----

    fn outcome(
        &self,
        invoice_number: &InvoiceNumber,
        winning: Option<&WinningNumbers>,
    ) -> InvoiceOutcome {
        match winning {
            None => InvoiceOutcome::Pending,
            Some(winning) => match self.matcher.match_invoice(invoice_number, winning) {
                Some(found) => InvoiceOutcome::Won(found),
                None => InvoiceOutcome::NoPrize,
            },
        }
    }

    fn fetch_winning_numbers(
        &self,
        period: InvoicePeriod,
    ) -> Result<Option<WinningNumbers>, LedgerError> {
        self.feed.winning_numbers(period).map_err(|err| {
            tracing::error!(period = %period, error = %err, "Winning numbers lookup failed");
            LedgerError::feed(err)
        })
    }

    fn record_fund(
        &self,
        group: &GroupId,
        amounts: &[(PersonId, Money)],
        date: NaiveDate,
        kind: FundKind,
    ) -> Result<Vec<FundEntry>, LedgerError> {
        if amounts.is_empty() {
            return Err(MalformedCommand::NoMembers.into());
        }
        let entries: Vec<FundEntry> = amounts
            .iter()
            .map(|(member, amount)| FundEntry {
                member: member.clone(),
                amount: *amount,
                kind,
                date,
            })
            .collect();
        for entry in &entries {
            entry.validate()?;
        }

        let scope = Scope::Group(group.clone());
        for (applied, entry) in entries.iter().enumerate() {
            if let Err(err) = self.append(&scope, Record::Fund(entry.clone())) {
                if applied > 0 {
                    tracing::error!(
                        group = %group,
                        applied,
                        pending = entries.len() - applied,
                        "Fund movement partially recorded"
                    );
                }
                return Err(err);
            }
        }
        tracing::info!(group = %group, ?kind, entry_count = entries.len(), "Fund movement recorded");
        Ok(entries)
    }

    fn records(&self, scope: &Scope) -> Result<Vec<Record>, LedgerError> {
        self.store
            .records(scope)
            .map_err(|err| self.store_failure(scope, err))
    }

    fn append(&self, scope: &Scope, record: Record) -> Result<(), LedgerError> {
        if let Err(err) = record.validate() {
            tracing::warn!(
                scope = %scope,
                reject_reason = "invalid_record",
                error = %err,
                "Record rejected"
            );
            return Err(err.into());
        }
        if !record.belongs_to(scope) {
            tracing::warn!(
                scope = %scope,
                reject_reason = "wrong_scope",
                kind = record_kind(&record),
                "Record rejected"
            );
            return Err(MalformedCommand::WrongScope {
                scope: scope.clone(),
                kind: record_kind(&record),
            }
            .into());
        }
        self.store
            .append(scope, record)
            .map_err(|err| self.store_failure(scope, err))
    }

    fn reset(&self, scope: &Scope) -> Result<usize, LedgerError> {
        let removed = self
            .store
            .reset(scope)
            .map_err(|err| self.store_failure(scope, err))?;
        tracing::info!(scope = %scope, removed, "Scope reset");
        Ok(removed)
    }

    /// Deletes the 1-based `positions` of the records selected by `listed`,
    /// highest first so lower store indexes stay valid. Positions are checked
    /// up front; the deletes themselves are not transactional.
    fn delete_positions(
        &self,
        scope: &Scope,
        positions: &[usize],
        listed: impl Fn(&Record) -> bool,
    ) -> Result<Vec<Record>, LedgerError> {
        if positions.is_empty() {
            return Err(MalformedCommand::NoPositions.into());
        }

        let records = self.records(scope)?;
        let listing: Vec<(usize, &Record)> = records
            .iter()
            .enumerate()
            .filter(|(_, record)| listed(record))
            .collect();
        let len = listing.len();

        let mut targets = positions.to_vec();
        targets.sort_unstable();
        targets.dedup();
        if let Some(&position) = targets
            .iter()
            .find(|&&position| position == 0 || position > len)
        {
            tracing::warn!(
                scope = %scope,
                position,
                len,
                reject_reason = "position_out_of_range",
                "Delete rejected"
            );
            return Err(LedgerError::RecordNotFound { position, len });
        }

        let mut deleted = Vec::with_capacity(targets.len());
        for &position in targets.iter().rev() {
            let (index, record) = listing[position - 1];
            let outcome = match self.store.delete(scope, index) {
                Ok(true) => Ok(()),
                Ok(false) => Err(LedgerError::RecordNotFound { position, len }),
                Err(err) => Err(self.store_failure(scope, err)),
            };
            if let Err(err) = outcome {
                if !deleted.is_empty() {
                    tracing::error!(
                        scope = %scope,
                        applied = deleted.len(),
                        pending = targets.len() - deleted.len(),
                        "Delete partially applied"
                    );
                }
                return Err(err);
            }
            deleted.push(record.clone());
        }
        deleted.reverse();

        tracing::info!(scope = %scope, deleted = deleted.len(), "Records deleted");
        Ok(deleted)
    }

    fn store_failure(&self, scope: &Scope, err: StoreError) -> LedgerError {
        tracing::error!(scope = %scope, error = %err, "Record store call failed");
        LedgerError::store(err)
    }
}

fn parse_invoice_number(raw: Option<&str>) -> Result<Option<InvoiceNumber>, LedgerError> {
    match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => Ok(Some(InvoiceNumber::parse(raw)?)),
        None => Ok(None),
    }
}

fn record_kind(record: &Record) -> &'static str {
    match record {
        Record::Expense(_) => "expense",
        Record::Personal(_) => "personal",
        Record::Fund(_) => "fund",
    }
}
