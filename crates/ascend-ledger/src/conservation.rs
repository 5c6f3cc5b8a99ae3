//! Conservation law verification for player ledgers.
//!
//! A ledger is balanced when its three views of invested points agree:
//!
//! ```text
//! total_points_spent == sum(branch_points)
//!                    == sum(level[t] * points_per_level[t])
//! ```
//!
//! [`PlayerLedger`] maintains this by construction. The check exists to
//! catch drift from corrupted records or definitions that changed between
//! a save and a reload.

use ascend_types::TalentId;

use crate::ledger::PlayerLedger;
use crate::LedgerAnomaly;

/// The result of verifying one ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConservationResult {
    /// All three totals agree.
    Balanced,
    /// The totals disagree or could not be computed.
    Anomaly(LedgerAnomaly),
}

/// Verify the conservation law for `ledger`.
///
/// `cost_of` returns the per-level cost of a talent, or `None` if the
/// talent is no longer defined. An undefined learned talent, a zero-level
/// entry, or an overflow while summing is reported as an anomaly.
pub fn verify_ledger<F>(ledger: &PlayerLedger, cost_of: F) -> ConservationResult
where
    F: Fn(&TalentId) -> Option<u32>,
{
    let total = ledger.total_points_spent();
    let mut branch_total: u64 = 0;
    for &points in ledger.branches().values() {
        branch_total = match branch_total.checked_add(u64::from(points)) {
            Some(sum) => sum,
            None => return overflow_anomaly(total, "branch points"),
        };
    }

    let mut talent_total: u64 = 0;
    for (talent, &level) in ledger.talents() {
        if level == 0 {
            return anomaly(
                total,
                branch_total,
                talent_total,
                format!("LEDGER_ANOMALY: talent {talent} stored at level 0"),
            );
        }
        let Some(cost) = cost_of(talent) else {
            return anomaly(
                total,
                branch_total,
                talent_total,
                format!("LEDGER_ANOMALY: learned talent {talent} has no definition"),
            );
        };
        let invested = u64::from(level).checked_mul(u64::from(cost));
        talent_total = match invested.and_then(|i| talent_total.checked_add(i)) {
            Some(sum) => sum,
            None => return overflow_anomaly(total, "talent costs"),
        };
    }

    let expected = u64::from(total);
    if branch_total == expected && talent_total == expected {
        ConservationResult::Balanced
    } else {
        anomaly(
            total,
            branch_total,
            talent_total,
            format!(
                "LEDGER_ANOMALY: total spent {total}, branch sum {branch_total}, \
                 talent cost sum {talent_total}"
            ),
        )
    }
}

fn anomaly(
    total: u32,
    branch_total: u64,
    talent_total: u64,
    message: String,
) -> ConservationResult {
    ConservationResult::Anomaly(LedgerAnomaly {
        total_points_spent: total,
        branch_total,
        talent_total,
        message,
    })
}

/// Construct an anomaly result for arithmetic overflow during summation.
fn overflow_anomaly(total: u32, what: &str) -> ConservationResult {
    anomaly(
        total,
        0,
        0,
        format!("LEDGER_ANOMALY: arithmetic overflow while summing {what}"),
    )
}
