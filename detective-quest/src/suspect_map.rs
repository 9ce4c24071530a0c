use std::collections::BTreeSet;
use tracing::trace;

pub const DEFAULT_CAPACITY: usize = 101;

const DJB2_SEED: u64 = 5381;

/// djb2: h = h * 33 + byte, wrapping.
pub fn hash_djb2(text: &str) -> u64 {
    text.bytes().fold(DJB2_SEED, |hash, byte| {
        hash.wrapping_mul(33).wrapping_add(u64::from(byte))
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    clue: String,
    suspect: String,
}

impl Association {
    pub fn clue(&self) -> &str {
        &self.clue
    }

    pub fn suspect(&self) -> &str {
        &self.suspect
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SuspectMapError {
    #[error("suspect table needs at least one bucket")]
    ZeroCapacity,
}

/// Chained hash table from clue text to the suspect it implicates.
///
/// The bucket count is fixed at construction; the table never rehashes.
/// Each chain keeps its newest association at the end of the `Vec`, and
/// walks run newest-first, which is the order a prepending chain would give.
#[derive(Debug, Clone)]
pub struct SuspectMap {
    buckets: Vec<Vec<Association>>,
    len: usize,
}

impl SuspectMap {
    pub fn with_capacity(capacity: usize) -> Result<Self, SuspectMapError> {
        if capacity == 0 {
            return Err(SuspectMapError::ZeroCapacity);
        }
        Ok(Self {
            buckets: vec![Vec::new(); capacity],
            len: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn bucket_of(&self, clue: &str) -> usize {
        let bucket = (hash_djb2(clue) % self.buckets.len() as u64) as usize;
        trace!(clue, bucket, "suspect table bucket");
        bucket
    }

    /// Associates `clue` with `suspect`. An existing association is
    /// overwritten in place and its previous suspect returned.
    pub fn insert(&mut self, clue: &str, suspect: &str) -> Option<String> {
        let bucket = self.bucket_of(clue);
        let chain = &mut self.buckets[bucket];
        if let Some(existing) = chain.iter_mut().rev().find(|a| a.clue == clue) {
            return Some(std::mem::replace(&mut existing.suspect, suspect.to_string()));
        }
        chain.push(Association {
            clue: clue.to_string(),
            suspect: suspect.to_string(),
        });
        self.len += 1;
        None
    }

    pub fn lookup(&self, clue: &str) -> Option<&str> {
        self.buckets[self.bucket_of(clue)]
            .iter()
            .rev()
            .find(|a| a.clue == clue)
            .map(Association::suspect)
    }

    /// Every association, bucket by bucket.
    pub fn iter(&self) -> impl Iterator<Item = &Association> {
        self.buckets.iter().flat_map(|chain| chain.iter().rev())
    }

    /// Distinct suspect names, sorted.
    pub fn suspects(&self) -> Vec<&str> {
        self.iter()
            .map(Association::suspect)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
