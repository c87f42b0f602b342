//! Joins visitor issuances with gate-scan logs.

use std::collections::HashMap;

use super::records::{ReconciledVisitor, ScanInfo, VisitorIssuance, VisitorScanLog};

/// Merges issuances with their scan logs into [`ReconciledVisitor`] views.
///
/// One pass builds a `qr_code_id -> scan log` map, a second pass joins.
/// Linear in the combined input size — visitor volumes at a busy gate make
/// a nested-loop join noticeably quadratic.
///
/// Every issuance appears exactly once in the output, whatever the scan
/// logs contain. Duplicate scan logs for the same id are unexpected but
/// tolerated: the last one in input order wins.
#[must_use]
pub fn reconcile(
    issuances: Vec<VisitorIssuance>,
    scan_logs: &[VisitorScanLog],
) -> Vec<ReconciledVisitor> {
    let mut by_qr_code: HashMap<&str, &VisitorScanLog> =
        HashMap::with_capacity(scan_logs.len());
    for log in scan_logs {
        by_qr_code.insert(log.qr_code_id.as_str(), log);
    }

    issuances
        .into_iter()
        .map(|issuance| {
            let scan = by_qr_code.get(issuance.id.as_str()).map(|log| ScanInfo {
                scanned_by: log.scanned_by_guard.clone(),
                scanned_at: log.scan_timestamp,
            });
            ReconciledVisitor { issuance, scan }
        })
        .collect()
}
