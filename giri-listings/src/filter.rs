use crate::record::ListingRecord;

/// Case-insensitive substring match on titles.
///
/// The query is used as typed; an empty query keeps every record.
pub fn matches(record: &ListingRecord, query: &str) -> bool {
    query.is_empty() || record.title.to_lowercase().contains(&query.to_lowercase())
}

/// Records whose title contains `query`, in input order.
pub fn filter_records(records: &[ListingRecord], query: &str) -> Vec<ListingRecord> {
    records
        .iter()
        .filter(|r| matches(r, query))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(titles: &[&str]) -> Vec<ListingRecord> {
        titles
            .iter()
            .map(|t| ListingRecord::new(*t, "https://x.test/"))
            .collect()
    }

    #[test]
    fn python_matches_first_and_third() {
        let records = titles(&["Intro to Python", "Data Science", "Python Advanced"]);
        let out = filter_records(&records, "python");
        let got: Vec<&str> = out.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(got, ["Intro to Python", "Python Advanced"]);
    }

    #[test]
    fn empty_query_returns_input_unchanged() {
        let records = titles(&["b", "a", "b"]);
        assert_eq!(filter_records(&records, ""), records);
    }

    #[test]
    fn query_case_is_ignored_but_spaces_are_not() {
        let records = titles(&["Machine Learning A-Z"]);
        assert_eq!(filter_records(&records, "LEARNING").len(), 1);
        assert_eq!(filter_records(&records, " learning ").len(), 1);
        assert!(filter_records(&records, " machine").is_empty());
        assert!(filter_records(&records, "learning  a").is_empty());
        assert!(filter_records(&records, "deep").is_empty());
    }
}
