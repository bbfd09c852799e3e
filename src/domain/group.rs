use crate::domain::common::Identifiable;
use crate::domain::transaction::{Transaction, TransactionId};

/// A run of consecutive transactions that share one journal number.
///
/// The anchor is a copy of the first member; the member list always holds at
/// least the anchor itself.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedGroup {
    anchor: Transaction,
    members: Vec<Transaction>,
}

impl MergedGroup {
    pub(crate) fn start(anchor: Transaction) -> Self {
        Self {
            members: vec![anchor.clone()],
            anchor,
        }
    }

    pub(crate) fn accepts(&self, transaction: &Transaction) -> bool {
        self.anchor.shares_journal_with(transaction)
    }

    pub(crate) fn push(&mut self, transaction: Transaction) {
        debug_assert!(self.accepts(&transaction));
        self.members.push(transaction);
    }

    pub fn anchor(&self) -> &Transaction {
        &self.anchor
    }

    pub fn members(&self) -> &[Transaction] {
        &self.members
    }

    pub fn journal_number(&self) -> Option<&str> {
        self.anchor.journal()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Groups are never empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Sum of the members' numeric amounts; unreadable amounts count as zero.
    pub fn total_amount(&self) -> f64 {
        self.members
            .iter()
            .filter_map(Transaction::amount)
            .sum()
    }

    pub fn contains(&self, id: &TransactionId) -> bool {
        self.members.iter().any(|member| member.id() == id)
    }

    pub fn into_members(self) -> Vec<Transaction> {
        self.members
    }
}

impl Identifiable for MergedGroup {
    type Id = TransactionId;

    fn id(&self) -> &TransactionId {
        &self.anchor.id
    }
}
