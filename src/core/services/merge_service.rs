//! Collapses raw transaction records into journal display groups.

use crate::domain::group::MergedGroup;
use crate::domain::transaction::{require_entries, Transaction};
use crate::errors::HistoryResult;

/// Outcome of a merge pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeResult {
    /// Groups in chronological (oldest first) order.
    pub groups: Vec<MergedGroup>,
    /// Set when nothing is left to display.
    pub no_transactions: bool,
}

/// Groups consecutive transactions that share a journal number.
pub struct TransactionMerger;

impl TransactionMerger {
    /// Filters reversal-related entries, restores chronological order and
    /// collapses adjacent entries with equal non-null journal numbers.
    ///
    /// `transactions` is expected newest first, as delivered by the service.
    pub fn merge(transactions: &[Transaction]) -> MergeResult {
        let chronological: Vec<&Transaction> = transactions
            .iter()
            .filter(|txn| !txn.is_reversal_related)
            .rev()
            .collect();

        let groups = Self::group_chronological(chronological);
        MergeResult {
            no_transactions: groups.is_empty(),
            groups,
        }
    }

    /// Like [`TransactionMerger::merge`] but over possibly-null entries; a
    /// `None` fails the whole pass.
    pub fn try_merge(entries: &[Option<Transaction>]) -> HistoryResult<MergeResult> {
        let transactions = require_entries(entries)?;
        Ok(Self::merge(&transactions))
    }

    /// Single walk over an already chronological sequence.
    pub fn group_chronological<'a, I>(transactions: I) -> Vec<MergedGroup>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut groups: Vec<MergedGroup> = Vec::new();
        for txn in transactions {
            match groups.last_mut() {
                Some(current) if current.accepts(txn) => current.push(txn.clone()),
                _ => groups.push(MergedGroup::start(txn.clone())),
            }
        }
        tracing::debug!(groups = groups.len(), "merged transactions");
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transaction::TransactionId;
    use crate::errors::HistoryError;

    fn ids(group: &MergedGroup) -> Vec<TransactionId> {
        group.members().iter().map(|txn| txn.id.clone()).collect()
    }

    #[test]
    fn groups_adjacent_equal_journals() {
        let t1 = Transaction::new(Some("A"), 100.0, "Rent");
        let t2 = Transaction::new(Some("A"), -5.0, "Fee");
        let t3 = Transaction::new(None, 20.0, "Adjustment");
        let t4 = Transaction::new(Some("B"), 100.0, "Rent");
        let chronological = [t1.clone(), t2.clone(), t3.clone(), t4.clone()];

        let groups = TransactionMerger::group_chronological(&chronological);

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].anchor().id, t1.id);
        assert_eq!(ids(&groups[0]), vec![t1.id.clone(), t2.id.clone()]);
        assert_eq!(ids(&groups[1]), vec![t3.id.clone()]);
        assert_eq!(ids(&groups[2]), vec![t4.id.clone()]);
    }

    #[test]
    fn merge_reverses_newest_first_input() {
        let older = Transaction::new(Some("A"), 1.0, "older");
        let newer = Transaction::new(Some("B"), 2.0, "newer");

        let result = TransactionMerger::merge(&[newer.clone(), older.clone()]);

        assert!(!result.no_transactions);
        assert_eq!(result.groups[0].anchor().id, older.id);
        assert_eq!(result.groups[1].anchor().id, newer.id);
    }

    #[test]
    fn reversal_related_entries_are_dropped_entirely() {
        let kept = Transaction::new(Some("A"), 10.0, "kept");
        let reversed = Transaction::new(Some("A"), 10.0, "reversed").reversal_related();
        let reversal = Transaction::new(Some("A"), -10.0, "reversal").reversal_related();

        let result = TransactionMerger::merge(&[reversal, reversed, kept.clone()]);

        assert_eq!(result.groups.len(), 1);
        assert_eq!(ids(&result.groups[0]), vec![kept.id.clone()]);
    }

    #[test]
    fn only_reversals_reports_no_transactions() {
        let reversal = Transaction::new(Some("A"), -10.0, "reversal").reversal_related();
        let result = TransactionMerger::merge(&[reversal]);
        assert!(result.no_transactions);
        assert!(result.groups.is_empty());
    }

    #[test]
    fn empty_input_reports_no_transactions() {
        let result = TransactionMerger::merge(&[]);
        assert!(result.no_transactions);
    }

    #[test]
    fn null_journals_stay_standalone() {
        let a = Transaction::new(None, 1.0, "a");
        let b = Transaction::new(None, 1.0, "b");
        let groups = TransactionMerger::group_chronological(&[a, b]);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn empty_journals_stay_standalone() {
        let a = Transaction::new(Some(""), 1.0, "a");
        let b = Transaction::new(Some(""), 1.0, "b");
        let groups = TransactionMerger::group_chronological(&[a, b]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].journal_number(), None);
    }

    #[test]
    fn non_adjacent_equal_journals_do_not_merge() {
        let a1 = Transaction::new(Some("A"), 1.0, "a1");
        let b = Transaction::new(Some("B"), 1.0, "b");
        let a2 = Transaction::new(Some("A"), 1.0, "a2");
        let groups = TransactionMerger::group_chronological(&[a1, b, a2]);
        assert_eq!(groups.len(), 3);
    }

    #[test]
    fn try_merge_rejects_null_entry() {
        let entries = vec![Some(Transaction::new(Some("A"), 1.0, "a")), None];
        let err = TransactionMerger::try_merge(&entries).expect_err("null entry must fail");
        assert!(
            matches!(err, HistoryError::Validation(ref message) if message.contains("entry 1")),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn group_totals_sum_members() {
        let groups = TransactionMerger::group_chronological(&[
            Transaction::new(Some("J"), 120.0, "Rent"),
            Transaction::new(Some("J"), -20.0, "Discount"),
        ]);
        assert_eq!(groups[0].total_amount(), 100.0);
        assert_eq!(groups[0].journal_number(), Some("J"));
    }
}
