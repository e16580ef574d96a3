use std::collections::{BTreeMap, HashMap};

use levenshtein_automata::{Distance, LevenshteinAutomatonBuilder, DFA, SINK_STATE};
use serde::{Deserialize, Serialize};

use crate::core::types::DocId;

/// Lookup parameters for [`RadixTree::find`].
#[derive(Debug, Clone, Copy)]
pub struct FindParams<'a> {
    pub term: &'a str,
    pub exact: bool,
    /// Maximum Levenshtein distance for fuzzy matches. Ignored when `exact`.
    pub tolerance: u32,
}

/// Compressed prefix tree over term characters.
///
/// Terminal nodes carry the full term and a map from internal document id to
/// the number of times the term occurred in that document's field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RadixTree {
    root: RadixNode,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RadixNode {
    /// Edge label leading from the parent into this node.
    subword: String,
    /// Full term, set only on terminal nodes.
    word: String,
    end: bool,
    docs: HashMap<DocId, u32>,
    children: BTreeMap<char, RadixNode>,
}

impl RadixTree {
    pub fn new() -> Self {
        RadixTree::default()
    }

    /// Records one occurrence of `word` for document `id`, splitting edges
    /// as needed. Splits keep both subtrees intact.
    pub fn insert(&mut self, word: &str, id: DocId) {
        Self::insert_at(&mut self.root, word, word, id);
    }

    fn insert_at(node: &mut RadixNode, word: &str, remaining: &str, id: DocId) {
        let Some(first) = remaining.chars().next() else {
            node.end = true;
            node.word = word.to_string();
            *node.docs.entry(id).or_insert(0) += 1;
            return;
        };

        let Some(child) = node.children.get_mut(&first) else {
            node.children.insert(first, RadixNode::terminal(remaining, word, id));
            return;
        };

        let common = common_prefix_len(&child.subword, remaining);
        if common == child.subword.len() {
            Self::insert_at(child, word, &remaining[common..], id);
            return;
        }

        // Partial overlap with the edge: split it at the common prefix.
        let mut detached = std::mem::take(child);
        let detached_first = detached.subword[common..].chars().next().unwrap();
        detached.subword = detached.subword[common..].to_string();

        let mut fork = RadixNode {
            subword: remaining[..common].to_string(),
            ..RadixNode::default()
        };
        fork.children.insert(detached_first, detached);

        if common == remaining.len() {
            fork.end = true;
            fork.word = word.to_string();
            fork.docs.insert(id, 1);
        } else {
            let rest = &remaining[common..];
            let rest_first = rest.chars().next().unwrap();
            fork.children
                .insert(rest_first, RadixNode::terminal(rest, word, id));
        }
        *child = fork;
    }

    /// Looks up terms matching `params.term`.
    ///
    /// Returns `(matched term, ids)` pairs: the exact terminal for `exact`
    /// lookups, the whole prefix subtree otherwise, plus terms within the
    /// Levenshtein tolerance when one is given. Fuzzy results are ordered by
    /// ascending distance, ties broken lexicographically; plain prefix
    /// results are lexicographic.
    pub fn find(&self, params: &FindParams) -> Vec<(String, Vec<DocId>)> {
        if params.exact {
            return match Self::locate(&self.root, params.term) {
                Some(node) if node.end => vec![(node.word.clone(), sorted_ids(&node.docs))],
                _ => Vec::new(),
            };
        }

        let mut ranked: BTreeMap<String, (u32, Vec<DocId>)> = BTreeMap::new();
        let prefix_rank = params.tolerance + 1;

        if let Some(subtree) = Self::locate_prefix(&self.root, params.term) {
            let mut terminals = Vec::new();
            collect_terminals(subtree, &mut terminals);
            for node in terminals {
                let rank = if node.word == params.term { 0 } else { prefix_rank };
                ranked.insert(node.word.clone(), (rank, sorted_ids(&node.docs)));
            }
        }

        if params.tolerance > 0 {
            let dfa = LevenshteinAutomatonBuilder::new(params.tolerance as u8, false)
                .build_dfa(params.term);
            let mut matches = Vec::new();
            Self::fuzzy_collect(
                &self.root,
                &dfa,
                dfa.initial_state(),
                params.tolerance,
                &mut matches,
            );
            for (node, distance) in matches {
                let entry = ranked
                    .entry(node.word.clone())
                    .or_insert_with(|| (distance, sorted_ids(&node.docs)));
                entry.0 = entry.0.min(distance);
            }
        }

        let mut results: Vec<(String, (u32, Vec<DocId>))> = ranked.into_iter().collect();
        results.sort_by(|a, b| a.1 .0.cmp(&b.1 .0).then_with(|| a.0.cmp(&b.0)));
        results
            .into_iter()
            .map(|(word, (_, ids))| (word, ids))
            .collect()
    }

    /// Drops document `id` from the terminal node of `word`, pruning edges
    /// that end up carrying neither documents nor children.
    pub fn remove_document(&mut self, word: &str, id: DocId) {
        Self::remove_at(&mut self.root, word, id);
    }

    /// Occurrence count recorded for `(word, id)`, 0 when absent.
    pub fn occurrences(&self, word: &str, id: DocId) -> u32 {
        Self::locate(&self.root, word)
            .filter(|node| node.end)
            .and_then(|node| node.docs.get(&id).copied())
            .unwrap_or(0)
    }

    /// Number of terminal nodes in the tree.
    pub fn term_count(&self) -> usize {
        let mut terminals = Vec::new();
        collect_terminals(&self.root, &mut terminals);
        terminals.len()
    }

    fn locate<'a>(node: &'a RadixNode, remaining: &str) -> Option<&'a RadixNode> {
        let Some(first) = remaining.chars().next() else {
            return Some(node);
        };
        let child = node.children.get(&first)?;
        let rest = remaining.strip_prefix(child.subword.as_str())?;
        Self::locate(child, rest)
    }

    fn locate_prefix<'a>(node: &'a RadixNode, remaining: &str) -> Option<&'a RadixNode> {
        let Some(first) = remaining.chars().next() else {
            return Some(node);
        };
        let child = node.children.get(&first)?;
        if let Some(rest) = remaining.strip_prefix(child.subword.as_str()) {
            Self::locate_prefix(child, rest)
        } else if child.subword.starts_with(remaining) {
            // The query ends inside this edge; the whole subtree matches.
            Some(child)
        } else {
            None
        }
    }

    fn fuzzy_collect<'a>(
        node: &'a RadixNode,
        dfa: &DFA,
        state: u32,
        tolerance: u32,
        out: &mut Vec<(&'a RadixNode, u32)>,
    ) {
        let mut state = state;
        for &byte in node.subword.as_bytes() {
            state = dfa.transition(state, byte);
            // The sink state means no completion of this path can match.
            if state == SINK_STATE {
                return;
            }
        }
        if node.end {
            if let Distance::Exact(d) = dfa.distance(state) {
                if u32::from(d) <= tolerance {
                    out.push((node, u32::from(d)));
                }
            }
        }
        for child in node.children.values() {
            Self::fuzzy_collect(child, dfa, state, tolerance, out);
        }
    }

    fn remove_at(node: &mut RadixNode, remaining: &str, id: DocId) -> bool {
        let Some(first) = remaining.chars().next() else {
            if node.end {
                node.docs.remove(&id);
                if node.docs.is_empty() {
                    node.end = false;
                    node.word.clear();
                }
            }
            return node.prunable();
        };

        let Some(child) = node.children.get_mut(&first) else {
            return false;
        };
        let Some(rest) = remaining.strip_prefix(child.subword.as_str()) else {
            return false;
        };
        let rest = rest.to_string();
        if Self::remove_at(child, &rest, id) {
            node.children.remove(&first);
        }
        node.prunable()
    }
}

impl RadixNode {
    fn terminal(subword: &str, word: &str, id: DocId) -> RadixNode {
        let mut docs = HashMap::new();
        docs.insert(id, 1);
        RadixNode {
            subword: subword.to_string(),
            word: word.to_string(),
            end: true,
            docs,
            children: BTreeMap::new(),
        }
    }

    fn prunable(&self) -> bool {
        !self.end && self.children.is_empty() && self.docs.is_empty()
    }
}

fn collect_terminals<'a>(node: &'a RadixNode, out: &mut Vec<&'a RadixNode>) {
    if node.end {
        out.push(node);
    }
    for child in node.children.values() {
        collect_terminals(child, out);
    }
}

fn sorted_ids(docs: &HashMap<DocId, u32>) -> Vec<DocId> {
    let mut ids: Vec<DocId> = docs.keys().copied().collect();
    ids.sort_unstable();
    ids
}

/// Byte length of the longest common prefix, cut at a char boundary.
fn common_prefix_len(a: &str, b: &str) -> usize {
    let mut len = 0;
    for (ca, cb) in a.chars().zip(b.chars()) {
        if ca != cb {
            break;
        }
        len += ca.len_utf8();
    }
    len
}
