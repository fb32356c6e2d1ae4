/// Substring the downloader emits when an item has finished.
pub const COMPLETION_MARKER: &str = "Downloaded item";

/// Notifications from this sub-channel are noise for the summary.
pub const EXCLUSION_MARKER: &str = "FFmpeg";

const SUMMARY_ITEM_LIMIT: usize = 3;

/// Receiver for free-text progress notifications emitted by a downloader.
pub trait ProgressSink: Send {
    fn record(&mut self, line: &str);
}

/// Collects progress lines for a single download operation.
///
/// Nothing is ever written to stdout or stderr from here: stdout carries
/// protocol frames while the server is running.
#[derive(Debug, Default)]
pub struct ProgressCollector {
    entries: Vec<String>,
    completed: usize,
}

impl ProgressCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completion notifications seen so far
    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render a short summary of the operation.
    ///
    /// Returns an empty string when nothing was recorded. The count line only
    /// appears for more than one completed item, and at most the last three
    /// completed items are listed.
    pub fn summarize(&self) -> String {
        if self.entries.is_empty() {
            return String::new();
        }

        let mut lines = Vec::new();

        if self.completed > 1 {
            lines.push(format!("Downloaded {} items", self.completed));
        }

        let relevant: Vec<&String> = self
            .entries
            .iter()
            .filter(|entry| entry.contains(COMPLETION_MARKER) && !entry.contains(EXCLUSION_MARKER))
            .collect();

        let skip = relevant.len().saturating_sub(SUMMARY_ITEM_LIMIT);
        lines.extend(relevant.into_iter().skip(skip).map(|entry| clean_item_name(entry)));

        lines.join("\n")
    }
}

impl ProgressSink for ProgressCollector {
    fn record(&mut self, line: &str) {
        if line.contains(COMPLETION_MARKER) {
            self.completed += 1;
        }
        self.entries.push(line.to_string());
    }
}

fn clean_item_name(entry: &str) -> String {
    entry
        .replace(COMPLETION_MARKER, "")
        .trim_matches(|c| matches!(c, ' ' | '\'' | '.' | '"'))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collector_with(lines: &[&str]) -> ProgressCollector {
        let mut collector = ProgressCollector::new();
        for line in lines {
            collector.record(line);
        }
        collector
    }

    #[test]
    fn test_empty_collector_summarizes_to_nothing() {
        let collector = ProgressCollector::new();
        assert!(collector.is_empty());
        assert_eq!(collector.summarize(), "");
    }

    #[test]
    fn test_three_items_with_count_line() {
        let collector = collector_with(&[
            "Downloaded item 'Song A'",
            "Downloaded item 'Song B'",
            "Downloaded item 'Song C'",
        ]);

        assert_eq!(collector.completed(), 3);
        assert_eq!(
            collector.summarize(),
            "Downloaded 3 items\nSong A\nSong B\nSong C"
        );
    }

    #[test]
    fn test_single_item_has_no_count_line() {
        let collector = collector_with(&["Downloaded item 'Only One'."]);
        assert_eq!(collector.summarize(), "Only One");
    }

    #[test]
    fn test_only_last_three_items_listed() {
        let lines: Vec<String> = (1..=7).map(|i| format!("Downloaded item \"Track {i}\"")).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let collector = collector_with(&refs);

        let summary = collector.summarize();
        let summary_lines: Vec<&str> = summary.lines().collect();
        assert_eq!(summary_lines, vec!["Downloaded 7 items", "Track 5", "Track 6", "Track 7"]);
    }

    #[test]
    fn test_excluded_subchannel_is_filtered_but_counted() {
        let collector = collector_with(&[
            "Downloaded item 'Song A'",
            "Downloaded item 'Song B' (FFmpeg warnings: extraction skipped)",
        ]);

        assert_eq!(collector.summarize(), "Downloaded 2 items\nSong A");
    }

    #[test]
    fn test_non_completion_lines_are_kept_but_not_listed() {
        let collector = collector_with(&["Starting download", "Fetching stream URL"]);

        assert_eq!(collector.entries().len(), 2);
        assert_eq!(collector.completed(), 0);
        assert_eq!(collector.summarize(), "");
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let collector = collector_with(&["Downloaded item 'A'", "Downloaded item 'B'"]);
        assert_eq!(collector.summarize(), collector.summarize());
    }
}
