use crate::scanner;
use std::collections::HashMap;
use std::hash::Hash;
use tracing::debug;

/// A key together with how many times it was seen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry<K> {
    pub key: K,
    pub count: usize,
}

/// Occurrence counts per key, remembering the order keys were first seen
#[derive(Debug, Clone)]
pub struct FrequencyTable<K> {
    counts: HashMap<K, usize>,
    first_seen: Vec<K>,
}

impl<K: Hash + Eq + Clone> FrequencyTable<K> {
    pub fn new() -> Self {
        FrequencyTable {
            counts: HashMap::new(),
            first_seen: Vec::new(),
        }
    }

    pub fn record(&mut self, key: K) {
        match self.counts.get_mut(&key) {
            Some(count) => *count += 1,
            None => {
                self.first_seen.push(key.clone());
                self.counts.insert(key, 1);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.first_seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first_seen.is_empty()
    }

    /// Entries in first-occurrence order
    fn entries(self) -> impl Iterator<Item = RankedEntry<K>> {
        let mut counts = self.counts;
        self.first_seen.into_iter().map(move |key| {
            let count = counts.remove(&key).unwrap_or(0);
            RankedEntry { key, count }
        })
    }

    /// Sort by count, highest first. Equal counts keep first-occurrence order.
    pub fn into_ranked(self) -> RankedList<K> {
        let mut entries: Vec<RankedEntry<K>> = self.entries().collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        RankedList { entries }
    }

    /// Keep only keys whose count is strictly greater than `threshold`.
    pub fn above_threshold(self, threshold: usize) -> SuspiciousSet<K> {
        let entries = self.entries().filter(|e| e.count > threshold).collect();
        SuspiciousSet { threshold, entries }
    }
}

impl<K: Hash + Eq + Clone> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq + Clone> FromIterator<K> for FrequencyTable<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut table = FrequencyTable::new();
        for key in iter {
            table.record(key);
        }
        table
    }
}

/// Counts sorted descending, ties in first-occurrence order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedList<K> {
    entries: Vec<RankedEntry<K>>,
}

/// The head of a ranked list, or the explicit absence of one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopEntry<'a, K> {
    Found(&'a RankedEntry<K>),
    Empty,
}

impl<K> RankedList<K> {
    pub fn top(&self) -> TopEntry<'_, K> {
        match self.entries.first() {
            Some(entry) => TopEntry::Found(entry),
            None => TopEntry::Empty,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RankedEntry<K>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a, K> IntoIterator for &'a RankedList<K> {
    type Item = &'a RankedEntry<K>;
    type IntoIter = std::slice::Iter<'a, RankedEntry<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// IPs whose failed-login count strictly exceeded the threshold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuspiciousSet<K> {
    threshold: usize,
    entries: Vec<RankedEntry<K>>,
}

impl<K: PartialEq> SuspiciousSet<K> {
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Flagged entries in the order their IPs first failed
    pub fn entries(&self) -> &[RankedEntry<K>] {
        &self.entries
    }

    pub fn get(&self, key: &K) -> Option<usize> {
        self.entries.iter().find(|e| &e.key == key).map(|e| e.count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Count valid IPv4 addresses in `text`, most frequent first.
pub fn extract_ip_counts(text: &str) -> RankedList<&str> {
    let table: FrequencyTable<&str> = scanner::ipv4_tokens(text)
        .filter(|token| scanner::is_valid_ipv4(token))
        .collect();
    debug!(unique_ips = table.len(), "counted requests per IP");
    table.into_ranked()
}

/// Count request-line targets in `text`, most frequent first.
pub fn extract_endpoint_counts(text: &str) -> RankedList<&str> {
    let table: FrequencyTable<&str> = scanner::request_targets(text).collect();
    debug!(unique_endpoints = table.len(), "counted requests per endpoint");
    table.into_ranked()
}

/// Tally failed logins per IP and keep those with more than `threshold`.
pub fn detect_brute_force(text: &str, threshold: usize) -> SuspiciousSet<&str> {
    let table: FrequencyTable<&str> = scanner::failed_logins(text).collect();
    debug!(
        failing_ips = table.len(),
        threshold, "counted failed logins per IP"
    );
    table.above_threshold(threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs<'a>(ranked: &RankedList<&'a str>) -> Vec<(&'a str, usize)> {
        ranked.iter().map(|e| (e.key, e.count)).collect()
    }

    fn failed_lines(ip: &str, n: usize) -> String {
        (0..n)
            .map(|i| format!("{} - - \"POST /login HTTP/1.1\" 401 {}\n", ip, i))
            .collect()
    }

    #[test]
    fn frequency_table_counts_occurrences() {
        let table: FrequencyTable<&str> = ["a", "b", "a", "c", "a"].into_iter().collect();
        assert_eq!(table.len(), 3);
        let ranked = table.into_ranked();
        assert_eq!(pairs(&ranked), vec![("a", 3), ("b", 1), ("c", 1)]);
    }

    #[test]
    fn ranking_is_descending_with_stable_ties() {
        let table: FrequencyTable<&str> =
            ["b", "a", "c", "a", "c", "d"].into_iter().collect();
        let ranked = table.into_ranked();
        assert_eq!(pairs(&ranked), vec![("a", 2), ("c", 2), ("b", 1), ("d", 1)]);
    }

    #[test]
    fn counts_ip_occurrences() {
        let text = "192.168.1.1 x\n10.0.0.5 y\n192.168.1.1 z\n192.168.1.1\n";
        let ranked = extract_ip_counts(text);
        assert_eq!(pairs(&ranked), vec![("192.168.1.1", 3), ("10.0.0.5", 1)]);
    }

    #[test]
    fn excludes_out_of_range_ips() {
        let text = "999.999.999.999 256.0.0.1 01.02.03.04";
        assert_eq!(pairs(&extract_ip_counts(text)), vec![("01.02.03.04", 1)]);
    }

    #[test]
    fn no_ips_gives_empty_ranking() {
        let ranked = extract_ip_counts("nothing to see here");
        assert!(ranked.is_empty());
        assert_eq!(ranked.top(), TopEntry::Empty);
    }

    #[test]
    fn top_endpoint_is_most_frequent() {
        let text = concat!(
            "1.1.1.1 \"GET /a HTTP/1.1\" 200\n",
            "1.1.1.1 \"GET /b HTTP/1.1\" 200\n",
            "1.1.1.1 \"POST /b HTTP/1.1\" 200\n",
            "1.1.1.1 \"TRACE /b HTTP/1.1\" 200\n",
        );
        let ranked = extract_endpoint_counts(text);
        assert_eq!(pairs(&ranked), vec![("/b", 2), ("/a", 1)]);
        match ranked.top() {
            TopEntry::Found(entry) => {
                assert_eq!(entry.key, "/b");
                assert_eq!(entry.count, 2);
            }
            TopEntry::Empty => panic!("expected a top endpoint"),
        }
    }

    #[test]
    fn threshold_count_is_not_flagged() {
        let text = failed_lines("10.0.0.5", 10);
        let flagged = detect_brute_force(&text, 10);
        assert!(flagged.is_empty());
        assert_eq!(flagged.threshold(), 10);
    }

    #[test]
    fn one_above_threshold_is_flagged() {
        let text = failed_lines("10.0.0.5", 11);
        let flagged = detect_brute_force(&text, 10);
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged.get(&"10.0.0.5"), Some(11));
    }

    #[test]
    fn custom_threshold_is_honored() {
        let text = format!("{}{}", failed_lines("1.1.1.1", 3), failed_lines("2.2.2.2", 2));
        let flagged = detect_brute_force(&text, 2);
        let keys: Vec<&str> = flagged.entries().iter().map(|e| e.key).collect();
        assert_eq!(keys, vec!["1.1.1.1"]);
    }

    #[test]
    fn flagged_ips_keep_first_failure_order() {
        let mut text = String::new();
        for _ in 0..3 {
            text.push_str("2.2.2.2 401\n1.1.1.1 Invalid credentials\n");
        }
        text.push_str("1.1.1.1 401\n");
        let flagged = detect_brute_force(&text, 0);
        let got: Vec<(&str, usize)> = flagged.entries().iter().map(|e| (e.key, e.count)).collect();
        assert_eq!(got, vec![("2.2.2.2", 3), ("1.1.1.1", 4)]);
    }
}
