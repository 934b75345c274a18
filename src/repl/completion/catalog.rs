//! Static candidate lists.

/// Built-in metadata fields every message carries.
pub const BUILT_IN_FIELDS: &[&str] = &[
    "_index",
    "_view",
    "_sourceCategory",
    "_sourceName",
    "_sourceHost",
    "_source",
    "_collector",
    "_loglevel",
    "_messageTime",
    "_receiptTime",
    "_messageCount",
    "_raw",
    "_size",
    "_format",
    "_dataTier",
];

/// Log levels offered after `_loglevel=`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "critical"];

/// Pipeline operators offered after `|`.
pub const SUMO_OPERATORS: &[&str] = &[
    "where",
    "parse",
    "parse regex",
    "json",
    "json auto",
    "keyvalue",
    "csv",
    "split",
    "fields",
    "count",
    "count_distinct",
    "count_frequent",
    "sum",
    "avg",
    "min",
    "max",
    "pct",
    "stddev",
    "first",
    "last",
    "most_recent",
    "least_recent",
    "top",
    "sort",
    "order",
    "limit",
    "dedup",
    "timeslice",
    "transpose",
    "fillmissing",
    "outlier",
    "predict",
    "compare",
    "logreduce",
    "logcompare",
    "lookup",
    "join",
    "merge",
    "save",
    "if",
    "isNull",
    "isEmpty",
    "isBlank",
    "concat",
    "replace",
    "substring",
    "toLowerCase",
    "toUpperCase",
    "trim",
    "length",
    "urldecode",
    "urlencode",
    "base64Decode",
    "base64Encode",
    "formatDate",
    "parseDate",
    "now",
    "geoip",
    "tourl",
    "accum",
    "backshift",
    "diff",
    "rollingstd",
    "smooth",
    "total",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_unique(items: &[&str]) {
        let set: HashSet<_> = items.iter().collect();
        assert_eq!(set.len(), items.len());
    }

    #[test]
    fn test_lists_have_no_duplicates() {
        assert_unique(BUILT_IN_FIELDS);
        assert_unique(LOG_LEVELS);
        assert_unique(SUMO_OPERATORS);
    }

    #[test]
    fn test_rule_fields_are_built_in() {
        for field in ["_index", "_sourceName", "_loglevel"] {
            assert!(BUILT_IN_FIELDS.contains(&field));
        }
    }
}
