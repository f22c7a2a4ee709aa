//! Stable content-derived identifiers
//!
//! Each candidate record is identified by a SHA-256 hash of its content
//! tuple, truncated to 16 hex characters, with a per-duplicate-group counter
//! suffix. Re-importing the same statement reproduces the same identifiers
//! (making inserts idempotent), while legitimately repeated purchases within
//! one batch stay distinct.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::models::Transaction;

use super::parser::CandidateTransaction;

/// Content signature for one candidate record
///
/// Field order and formatting are part of the identifier contract: the date
/// ISO form, the amount at exactly two decimals, and the lowercase kind name.
fn signature(candidate: &CandidateTransaction) -> String {
    format!(
        "{}|{}|{}|{}|{}|{}",
        candidate.date.format("%Y-%m-%d"),
        candidate
            .posted_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        candidate.amount.format_plain(),
        candidate.description,
        candidate.account,
        candidate.kind
    )
}

/// SHA-256 of the signature, truncated to 16 hex characters
fn base_hash(signature: &str) -> String {
    let digest = Sha256::digest(signature.as_bytes());
    hex::encode(digest)[..16].to_string()
}

/// Assign external identifiers to a batch, in batch order
///
/// Identical records within the batch share a base hash and receive `-1`,
/// `-2`, … suffixes in order, so the assignment is deterministic for a fixed
/// batch and stable across re-imports.
pub fn assign_external_ids(candidates: &[CandidateTransaction]) -> Vec<String> {
    let mut seen: HashMap<String, u32> = HashMap::new();

    candidates
        .iter()
        .map(|candidate| {
            let hash = base_hash(&signature(candidate));
            let n = seen.entry(hash.clone()).or_insert(0);
            *n += 1;
            format!("{}-{}", hash, n)
        })
        .collect()
}

/// Build ledger transactions from identified candidates
pub fn into_transactions(
    candidates: Vec<CandidateTransaction>,
    created_at: DateTime<Utc>,
) -> Vec<Transaction> {
    let ids = assign_external_ids(&candidates);
    candidates
        .into_iter()
        .zip(ids)
        .map(|(candidate, external_id)| Transaction {
            external_id,
            date: candidate.date,
            posted_date: candidate.posted_date,
            description: candidate.description,
            amount: candidate.amount,
            kind: candidate.kind,
            account: candidate.account,
            category: candidate.category,
            excluded: candidate.excluded,
            notes: candidate.notes,
            created_at,
        })
        .collect()
}
