/// Canonical country labels and the names that map onto them.
///
/// Catalog entries use the canonical label; user input may use any alias.
const COUNTRY_ALIASES: &[(&str, &[&str])] = &[
    ("美国", &["us", "usa", "u.s.", "u.s.a.", "united states", "united states of america", "america"]),
    ("英国", &["uk", "gb", "u.k.", "united kingdom", "great britain", "britain", "england"]),
    ("加拿大", &["ca", "canada"]),
    ("澳大利亚", &["au", "australia", "澳洲"]),
    ("新加坡", &["sg", "singapore"]),
    ("香港", &["hk", "hong kong", "中国香港"]),
];

/// Map a user-supplied country name to its canonical label
///
/// Unknown names are returned trimmed but otherwise unchanged.
pub fn canonical_country(name: &str) -> String {
    let trimmed = name.trim();
    let lowered = trimmed.to_lowercase();

    for (canonical, aliases) in COUNTRY_ALIASES {
        if trimmed == *canonical || aliases.iter().any(|alias| *alias == lowered) {
            return (*canonical).to_string();
        }
    }

    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_resolve_to_canonical() {
        assert_eq!(canonical_country("UK"), "英国");
        assert_eq!(canonical_country(" United Kingdom "), "英国");
        assert_eq!(canonical_country("英国"), "英国");
        assert_eq!(canonical_country("usa"), "美国");
        assert_eq!(canonical_country("Hong Kong"), "香港");
    }

    #[test]
    fn test_unknown_country_passes_through() {
        assert_eq!(canonical_country("  Germany "), "Germany");
        assert_eq!(canonical_country(""), "");
    }
}
