use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::api::DirectoryEntry;
use crate::app::editor::ALL_BRANCHES;

pub const MAX_SUGGESTIONS: usize = 5;

/// Directory names that fuzzy-match `query`, best match first.
pub fn suggest_names(names: &[String], query: &str, limit: usize) -> Vec<String> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default().ignore_case();
    let mut scored: Vec<(i64, &String)> = names
        .iter()
        .filter(|name| name.as_str() != query)
        .filter_map(|name| matcher.fuzzy_match(name, query).map(|score| (score, name)))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, name)| name.clone())
        .collect()
}

/// Distinct non-blank reservoir names from the directory, in directory order.
pub fn directory_names(entries: &[DirectoryEntry]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in entries.iter().filter_map(|entry| entry.name.as_deref()) {
        let name = name.trim();
        if !name.is_empty() && !names.iter().any(|known| known == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// `"all"`, then configured branches, then branches only the directory knows.
pub fn branch_choices(configured: &[String], entries: &[DirectoryEntry]) -> Vec<String> {
    let mut choices = vec![ALL_BRANCHES.to_string()];
    let from_directory = entries.iter().filter_map(|entry| entry.fili.as_deref());
    for branch in configured.iter().map(String::as_str).chain(from_directory) {
        let branch = branch.trim();
        if !branch.is_empty() && !choices.iter().any(|known| known == branch) {
            choices.push(branch.to_string());
        }
    }
    choices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::EntryId;

    fn entry(id: i64, name: &str, fili: &str) -> DirectoryEntry {
        DirectoryEntry {
            id: EntryId::Number(id),
            name: Some(name.to_string()),
            lat: None,
            lon: None,
            fili: Some(fili.to_string()),
        }
    }

    #[test]
    fn fuzzy_matches_rank_closest_first() {
        let names = vec![
            "Kapshagay".to_string(),
            "Bukhtarma".to_string(),
            "Kengir".to_string(),
            "Shardara".to_string(),
        ];
        let hits = suggest_names(&names, "kap", MAX_SUGGESTIONS);
        assert_eq!(hits.first().map(String::as_str), Some("Kapshagay"));
        assert!(!hits.contains(&"Shardara".to_string()));
        assert!(suggest_names(&names, "  ", MAX_SUGGESTIONS).is_empty());
    }

    #[test]
    fn exact_name_is_not_suggested_again() {
        let names = vec!["Kengir".to_string()];
        assert!(suggest_names(&names, "Kengir", MAX_SUGGESTIONS).is_empty());
    }

    #[test]
    fn branches_are_deduplicated_in_order() {
        let entries = vec![
            entry(1, "Kapshagay", "Almaty"),
            entry(2, "Bukhtarma", "East"),
            entry(3, "Ust-Kamenogorsk", "East"),
            entry(4, "Sergeev", " "),
        ];
        let configured = vec!["South".to_string(), "Almaty".to_string()];

        assert_eq!(
            branch_choices(&configured, &entries),
            ["all", "South", "Almaty", "East"]
        );
        assert_eq!(directory_names(&entries).len(), 4);
    }
}
