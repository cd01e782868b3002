use std::path::Path;

pub fn simplify_file_name(path: &str) -> String {
    if is_remote(path) {
        // The last segment of the URL, without the query.
        let without_query = path.split(['?', '#']).next().unwrap_or(path);
        return without_query
            .rsplit('/')
            .find(|s| !s.is_empty())
            .unwrap_or(path)
            .to_string();
    }
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

pub fn is_remote(source: &str) -> bool {
    let lower = source.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Cleans up the names of the columns: surrounding spaces and the byte order mark
/// some spreadsheet programs put in front of the file.
pub fn normalize_header<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|s| s.as_ref().trim_start_matches('\u{feff}').trim().to_string())
        .collect()
}

pub fn is_blank<S: AsRef<str>>(cells: &[S]) -> bool {
    cells.iter().all(|c| c.as_ref().trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names() {
        assert_eq!(simplify_file_name("/data/votings.csv"), "votings.csv");
        assert_eq!(simplify_file_name("votings.csv"), "votings.csv");
        assert_eq!(
            simplify_file_name("https://example.org/open-data/votings.csv?raw=true"),
            "votings.csv"
        );
    }

    #[test]
    fn remote_sources() {
        assert!(is_remote("https://example.org/votings.csv"));
        assert!(is_remote("HTTP://example.org/votings.csv"));
        assert!(!is_remote("/data/votings.csv"));
        assert!(!is_remote("http_votes.csv"));
    }

    #[test]
    fn header_cleanup() {
        let h = normalize_header(["\u{feff}id", " proposer ", "topic"]);
        assert_eq!(h, vec!["id", "proposer", "topic"]);
    }

    #[test]
    fn blank_rows() {
        assert!(is_blank(&["", " ", ""]));
        assert!(!is_blank(&["", "1"]));
    }
}
