use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::{info, warn};

use crate::qa::records::{FLAT_DATASET, INGESTED_DATASET};
use crate::qa::{PartitionKey, Prepared};

/// The three-way partition of the joined key space. Each list is sorted and
/// duplicate-free.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeyOverlap {
    pub only_raw: Vec<PartitionKey>,
    pub only_sem: Vec<PartitionKey>,
    pub in_both: Vec<PartitionKey>,
}

pub fn compute_key_overlap<F, S>(
    flat_for_qa: &[Prepared<F>],
    sem_for_qa: &[Prepared<S>],
) -> KeyOverlap {
    let raw_keys = key_set(FLAT_DATASET, flat_for_qa);
    let sem_keys = key_set(INGESTED_DATASET, sem_for_qa);

    let overlap = KeyOverlap {
        only_raw: raw_keys.difference(&sem_keys).map(|key| (*key).clone()).collect(),
        only_sem: sem_keys.difference(&raw_keys).map(|key| (*key).clone()).collect(),
        in_both: raw_keys.intersection(&sem_keys).map(|key| (*key).clone()).collect(),
    };

    info!(
        only_raw = overlap.only_raw.len(),
        only_sem = overlap.only_sem.len(),
        in_both = overlap.in_both.len(),
        "computed key overlap"
    );
    overlap
}

fn key_set<'a, R>(dataset: &str, rows: &'a [Prepared<R>]) -> BTreeSet<&'a PartitionKey> {
    let keys = rows.iter().map(|row| &row.key).collect::<BTreeSet<_>>();
    let duplicates = rows.len() - keys.len();
    if duplicates > 0 {
        warn!(
            dataset,
            duplicates, "duplicate keys found; only the first row per key is compared"
        );
    }
    keys
}

/// Maps each key to the first row carrying it, in input order.
pub(crate) fn first_row_index<R>(rows: &[Prepared<R>]) -> BTreeMap<&PartitionKey, &R> {
    let mut index = BTreeMap::new();
    for row in rows {
        index.entry(&row.key).or_insert(&row.record);
    }
    index
}
