//! Journal entry aggregate: header + lines, Draft -> Posted lifecycle,
//! double-entry balance invariant.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bookforge_core::{
    AccountCode, Currency, DomainError, DomainResult, Entity, InvoiceId, JournalEntryId, Money,
};

/// Business keys are short document numbers, not prose.
pub const ENTRY_NUMBER_MAX_LEN: usize = 20;

/// Journal entry lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalEntryStatus {
    /// Mutable: lines may still be added.
    Draft,
    /// Immutable; the only state the ledger accepts.
    Posted,
    /// Posted, then voided by a reversing workflow.
    Cancelled,
    /// Posted, then superseded by an adjusting entry.
    Adjusted,
}

/// One side of a journal entry.
///
/// Exactly one of debit/credit is strictly positive; direction is the
/// side, never the sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntryLine {
    account_code: AccountCode,
    debit: Money,
    credit: Money,
    description: String,
}

impl JournalEntryLine {
    pub fn new(
        account_code: AccountCode,
        debit: Money,
        credit: Money,
        description: impl Into<String>,
    ) -> DomainResult<Self> {
        if debit.currency() != credit.currency() {
            return Err(DomainError::validation(format!(
                "line sides disagree on currency: {} vs {}",
                debit.currency(),
                credit.currency()
            )));
        }
        match (debit.is_positive(), credit.is_positive()) {
            (true, true) => Err(DomainError::validation(
                "a line is either debit or credit, never both",
            )),
            (false, false) => Err(DomainError::validation(
                "a line must carry a positive debit or credit amount",
            )),
            _ => Ok(Self {
                account_code,
                debit,
                credit,
                description: description.into(),
            }),
        }
    }

    pub fn account_code(&self) -> &AccountCode {
        &self.account_code
    }

    pub fn debit(&self) -> Money {
        self.debit
    }

    pub fn credit(&self) -> Money {
        self.credit
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_debit(&self) -> bool {
        self.debit.is_positive()
    }

    pub fn currency(&self) -> Currency {
        self.debit.currency()
    }
}

/// Journal entry aggregate root.
///
/// Built in Draft through [`JournalEntry::add_line`], then posted exactly
/// once. Entry-number uniqueness and account existence are the intake
/// layer's job (see [`crate::intake`]); the aggregate stays pure so it can
/// be tested without any registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    id: JournalEntryId,
    entry_number: String,
    original_document_number: String,
    entry_date: DateTime<Utc>,
    original_document_date: DateTime<Utc>,
    description: String,
    reference: Option<String>,
    invoice_id: Option<InvoiceId>,
    lines: Vec<JournalEntryLine>,
    status: JournalEntryStatus,
    posted_at: Option<DateTime<Utc>>,
    posted_by: Option<String>,
    created_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Create a Draft entry with no lines.
    pub fn create(
        entry_number: impl Into<String>,
        original_document_number: impl Into<String>,
        entry_date: DateTime<Utc>,
        original_document_date: DateTime<Utc>,
        description: impl Into<String>,
        reference: Option<String>,
    ) -> DomainResult<Self> {
        let entry_number = entry_number.into();
        let original_document_number = original_document_number.into();
        let description = description.into();

        if entry_number.trim().is_empty() {
            return Err(DomainError::validation("entry number must not be blank"));
        }
        if entry_number.chars().count() > ENTRY_NUMBER_MAX_LEN {
            return Err(DomainError::validation(format!(
                "entry number must be at most {ENTRY_NUMBER_MAX_LEN} characters"
            )));
        }
        if original_document_number.trim().is_empty() {
            return Err(DomainError::validation(
                "original document number must not be blank",
            ));
        }
        if description.trim().is_empty() {
            return Err(DomainError::validation("description must not be blank"));
        }

        let now = Utc::now();
        if entry_date > now {
            return Err(DomainError::validation("entry date must not be in the future"));
        }
        if original_document_date > now {
            return Err(DomainError::validation(
                "original document date must not be in the future",
            ));
        }

        Ok(Self {
            id: JournalEntryId::new(),
            entry_number,
            original_document_number,
            entry_date,
            original_document_date,
            description,
            reference,
            invoice_id: None,
            lines: Vec::new(),
            status: JournalEntryStatus::Draft,
            posted_at: None,
            posted_by: None,
            created_at: now,
        })
    }

    fn ensure_draft(&self, operation: &str) -> DomainResult<()> {
        if self.status != JournalEntryStatus::Draft {
            return Err(DomainError::invalid_state(format!(
                "cannot {operation}: entry {} is {:?}, not draft",
                self.entry_number, self.status
            )));
        }
        Ok(())
    }

    /// Append a line to a Draft entry.
    ///
    /// All lines of an entry share one currency; the first line fixes it.
    pub fn add_line(
        &mut self,
        account_code: AccountCode,
        debit: Money,
        credit: Money,
        description: impl Into<String>,
    ) -> DomainResult<()> {
        self.ensure_draft("add a line")?;
        let line = JournalEntryLine::new(account_code, debit, credit, description)?;
        if let Some(currency) = self.currency() {
            if line.currency() != currency {
                return Err(DomainError::validation(format!(
                    "line currency {} differs from entry currency {currency}",
                    line.currency()
                )));
            }
        }
        self.lines.push(line);
        Ok(())
    }

    /// Cross-reference the invoice this entry books revenue for.
    pub fn link_to_invoice(&mut self, invoice_id: InvoiceId) -> DomainResult<()> {
        self.ensure_draft("link an invoice")?;
        self.invoice_id = Some(invoice_id);
        Ok(())
    }

    /// Post the entry: validates the balance invariant and freezes it.
    pub fn post(&mut self, posted_by: impl Into<String>) -> DomainResult<()> {
        self.ensure_draft("post")?;
        let posted_by = posted_by.into();
        if posted_by.trim().is_empty() {
            return Err(DomainError::validation("posted_by must not be blank"));
        }
        if self.lines.is_empty() {
            return Err(DomainError::validation(
                "an entry must have at least one line to post",
            ));
        }

        let total_debit = self.total_debit();
        let total_credit = self.total_credit();
        if total_debit != total_credit {
            return Err(DomainError::unbalanced(total_debit, total_credit));
        }

        self.status = JournalEntryStatus::Posted;
        self.posted_at = Some(Utc::now());
        self.posted_by = Some(posted_by);
        Ok(())
    }

    /// Mark a posted entry cancelled. Producing the reversing entry is the
    /// caller's workflow.
    pub fn mark_cancelled(&mut self) -> DomainResult<()> {
        self.ensure_posted("cancel")?;
        self.status = JournalEntryStatus::Cancelled;
        Ok(())
    }

    /// Mark a posted entry adjusted (superseded by an adjusting entry).
    pub fn mark_adjusted(&mut self) -> DomainResult<()> {
        self.ensure_posted("adjust")?;
        self.status = JournalEntryStatus::Adjusted;
        Ok(())
    }

    fn ensure_posted(&self, operation: &str) -> DomainResult<()> {
        if self.status != JournalEntryStatus::Posted {
            return Err(DomainError::invalid_state(format!(
                "cannot {operation}: entry {} is {:?}, not posted",
                self.entry_number, self.status
            )));
        }
        Ok(())
    }

    pub fn id_typed(&self) -> JournalEntryId {
        self.id
    }

    pub fn entry_number(&self) -> &str {
        &self.entry_number
    }

    pub fn original_document_number(&self) -> &str {
        &self.original_document_number
    }

    pub fn entry_date(&self) -> DateTime<Utc> {
        self.entry_date
    }

    pub fn original_document_date(&self) -> DateTime<Utc> {
        self.original_document_date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn invoice_id(&self) -> Option<InvoiceId> {
        self.invoice_id
    }

    pub fn lines(&self) -> &[JournalEntryLine] {
        &self.lines
    }

    pub fn status(&self) -> JournalEntryStatus {
        self.status
    }

    pub fn is_posted(&self) -> bool {
        self.status == JournalEntryStatus::Posted
    }

    pub fn posted_at(&self) -> Option<DateTime<Utc>> {
        self.posted_at
    }

    pub fn posted_by(&self) -> Option<&str> {
        self.posted_by.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Currency shared by all lines; `None` while the entry has no lines.
    pub fn currency(&self) -> Option<Currency> {
        self.lines.first().map(JournalEntryLine::currency)
    }

    pub fn total_debit(&self) -> Decimal {
        self.lines.iter().map(|l| l.debit.amount()).sum()
    }

    pub fn total_credit(&self) -> Decimal {
        self.lines.iter().map(|l| l.credit.amount()).sum()
    }

    pub fn is_balanced(&self) -> bool {
        self.total_debit() == self.total_credit()
    }
}

impl Entity for JournalEntry {
    type Id = JournalEntryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn test_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
    }

    fn vnd(amount: Decimal) -> Money {
        Money::new(amount, Currency::Vnd).unwrap()
    }

    fn draft_entry() -> JournalEntry {
        JournalEntry::create(
            "BT-0001",
            "INV-001",
            test_date(),
            test_date(),
            "Cash sale",
            None,
        )
        .unwrap()
    }

    fn code(s: &str) -> AccountCode {
        AccountCode::new(s).unwrap()
    }

    #[test]
    fn create_rejects_blank_fields() {
        for (number, doc, desc) in [
            ("", "INV-001", "desc"),
            ("BT-0001", "  ", "desc"),
            ("BT-0001", "INV-001", ""),
        ] {
            let result =
                JournalEntry::create(number, doc, test_date(), test_date(), desc, None);
            assert!(matches!(result, Err(DomainError::Validation(_))));
        }
    }

    #[test]
    fn create_rejects_overlong_entry_number() {
        let result = JournalEntry::create(
            "BT-000000000000000001",
            "INV-001",
            test_date(),
            test_date(),
            "desc",
            None,
        );
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn create_rejects_future_dates() {
        let tomorrow = Utc::now() + chrono::Duration::days(1);
        let result =
            JournalEntry::create("BT-0001", "INV-001", tomorrow, test_date(), "desc", None);
        assert!(matches!(result, Err(DomainError::Validation(_))));

        let result =
            JournalEntry::create("BT-0001", "INV-001", test_date(), tomorrow, "desc", None);
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn line_is_one_sided() {
        let both = JournalEntryLine::new(
            code("111"),
            vnd(dec!(100)),
            vnd(dec!(100)),
            "both sides",
        );
        assert!(matches!(both, Err(DomainError::Validation(_))));

        let neither = JournalEntryLine::new(
            code("111"),
            Money::zero(Currency::Vnd),
            Money::zero(Currency::Vnd),
            "neither side",
        );
        assert!(matches!(neither, Err(DomainError::Validation(_))));
    }

    #[test]
    fn lines_share_one_currency() {
        let mut entry = draft_entry();
        entry
            .add_line(code("111"), vnd(dec!(100)), Money::zero(Currency::Vnd), "cash")
            .unwrap();

        let err = entry
            .add_line(
                code("511"),
                Money::zero(Currency::Usd),
                Money::new(dec!(100), Currency::Usd).unwrap(),
                "revenue",
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn post_rejects_empty_entry() {
        let mut entry = draft_entry();
        let err = entry.post("accountant").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn post_rejects_unbalanced_entry() {
        let mut entry = draft_entry();
        entry
            .add_line(code("111"), vnd(dec!(100)), Money::zero(Currency::Vnd), "cash")
            .unwrap();
        entry
            .add_line(code("511"), Money::zero(Currency::Vnd), vnd(dec!(90)), "revenue")
            .unwrap();

        let err = entry.post("accountant").unwrap_err();
        match err {
            DomainError::Unbalanced {
                total_debit,
                total_credit,
            } => {
                assert_eq!(total_debit, dec!(100));
                assert_eq!(total_credit, dec!(90));
            }
            other => panic!("expected unbalanced error, got {other:?}"),
        }
        assert_eq!(entry.status(), JournalEntryStatus::Draft);
    }

    #[test]
    fn post_freezes_the_entry() {
        let mut entry = draft_entry();
        entry
            .add_line(code("111"), vnd(dec!(100)), Money::zero(Currency::Vnd), "cash")
            .unwrap();
        entry
            .add_line(code("511"), Money::zero(Currency::Vnd), vnd(dec!(100)), "revenue")
            .unwrap();
        entry.post("accountant").unwrap();

        assert!(entry.is_posted());
        assert_eq!(entry.posted_by(), Some("accountant"));
        assert!(entry.posted_at().is_some());

        let err = entry
            .add_line(code("112"), vnd(dec!(10)), Money::zero(Currency::Vnd), "late line")
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));

        let err = entry.post("accountant").unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[test]
    fn invoice_link_is_draft_only() {
        let mut entry = draft_entry();
        entry.link_to_invoice(InvoiceId::new()).unwrap();
        assert!(entry.invoice_id().is_some());

        entry
            .add_line(code("111"), vnd(dec!(100)), Money::zero(Currency::Vnd), "cash")
            .unwrap();
        entry
            .add_line(code("511"), Money::zero(Currency::Vnd), vnd(dec!(100)), "revenue")
            .unwrap();
        entry.post("accountant").unwrap();

        let err = entry.link_to_invoice(InvoiceId::new()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[test]
    fn cancel_and_adjust_require_posted() {
        let mut entry = draft_entry();
        assert!(entry.mark_cancelled().is_err());
        assert!(entry.mark_adjusted().is_err());

        entry
            .add_line(code("111"), vnd(dec!(50)), Money::zero(Currency::Vnd), "cash")
            .unwrap();
        entry
            .add_line(code("511"), Money::zero(Currency::Vnd), vnd(dec!(50)), "revenue")
            .unwrap();
        entry.post("accountant").unwrap();

        entry.mark_cancelled().unwrap();
        assert_eq!(entry.status(), JournalEntryStatus::Cancelled);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: any entry built from balanced debit/credit pairs posts
        /// successfully, and its totals remain exactly equal afterwards.
        #[test]
        fn balanced_entries_always_post(
            amounts in prop::collection::vec(1i64..1_000_000i64, 1..10)
        ) {
            let mut entry = draft_entry();

            for (i, amount) in amounts.iter().enumerate() {
                let amount = Decimal::from(*amount);
                entry
                    .add_line(
                        code("111"),
                        vnd(amount),
                        Money::zero(Currency::Vnd),
                        format!("debit {i}"),
                    )
                    .unwrap();
                entry
                    .add_line(
                        code("511"),
                        Money::zero(Currency::Vnd),
                        vnd(amount),
                        format!("credit {i}"),
                    )
                    .unwrap();
            }

            entry.post("accountant").unwrap();
            prop_assert!(entry.is_posted());
            prop_assert_eq!(entry.total_debit(), entry.total_credit());
        }
    }
}
