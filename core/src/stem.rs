use indexmap::IndexMap;

use crate::config::{PostingsPolicy, StemMerge};
use crate::index::{DocId, NonPositionalIndex};
use crate::tokenizer::french_stem;

/// Re-keys `index` by the French stem of every token.
///
/// Tokens are visited in the index's first-seen order. With
/// [`StemMerge::Overwrite`] a colliding token replaces the postings of the
/// previous one; with [`StemMerge::Union`] the postings are concatenated and
/// re-sorted by document id, collapsing repeats only under
/// [`PostingsPolicy::PerDocument`].
pub fn stem_index(index: &NonPositionalIndex, merge: StemMerge, policy: PostingsPolicy) -> NonPositionalIndex {
    let mut stemmed: IndexMap<String, Vec<DocId>> = IndexMap::new();
    let mut collisions = 0usize;

    for (token, postings) in index.iter() {
        let stem = french_stem(token);
        match merge {
            StemMerge::Overwrite => {
                if stemmed.insert(stem, postings.to_vec()).is_some() {
                    collisions += 1;
                }
            }
            StemMerge::Union => {
                let list = stemmed.entry(stem).or_default();
                if !list.is_empty() {
                    collisions += 1;
                }
                list.extend_from_slice(postings);
            }
        }
    }

    if merge == StemMerge::Union {
        for list in stemmed.values_mut() {
            list.sort_unstable();
            if policy == PostingsPolicy::PerDocument {
                list.dedup();
            }
        }
    }

    tracing::debug!(terms = index.len(), stems = stemmed.len(), collisions, ?merge, "stemmed index");
    NonPositionalIndex::from(stemmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NonPositionalIndex {
        let mut index = NonPositionalIndex::new();
        index.add("chats", 2, PostingsPolicy::PerOccurrence);
        index.add("chat", 0, PostingsPolicy::PerOccurrence);
        index.add("chat", 2, PostingsPolicy::PerOccurrence);
        index
    }

    #[test]
    fn union_keeps_every_posting_sorted() {
        let stemmed = stem_index(&sample(), StemMerge::Union, PostingsPolicy::PerOccurrence);
        assert_eq!(stemmed.get("chat"), Some(&[0, 2, 2][..]));
    }

    #[test]
    fn union_collapses_under_per_document() {
        let stemmed = stem_index(&sample(), StemMerge::Union, PostingsPolicy::PerDocument);
        assert_eq!(stemmed.get("chat"), Some(&[0, 2][..]));
    }

    #[test]
    fn overwrite_keeps_last_token() {
        let stemmed = stem_index(&sample(), StemMerge::Overwrite, PostingsPolicy::PerOccurrence);
        assert_eq!(stemmed.get("chat"), Some(&[0, 2][..]));
        assert_eq!(stemmed.len(), 1);
    }
}
