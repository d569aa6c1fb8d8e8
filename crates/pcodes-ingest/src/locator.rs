//! Choosing the gazetteer resource among a dataset's files.

use std::sync::LazyLock;

use regex::Regex;

use pcodes_model::Diagnostics;

use crate::catalog::{Dataset, Resource};

const SPREADSHEET_TYPES: [&str; 2] = ["xlsx", "xls"];
const GAZETTEER_KEYWORDS: [&str; 2] = ["gazetteer", "taxonomy"];

static TABULAR_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^.*adm.*tabular.?data").expect("Invalid tabular data regex")
});

/// Pick the gazetteer resource of `dataset`.
///
/// `exception` is an exact resource name configured for the country. Returns
/// `None` and records a warning when nothing qualifies; when several resources
/// survive every filter the first is used.
pub fn find_gazetteer<'a>(
    dataset: &'a Dataset,
    exception: Option<&str>,
    diagnostics: &mut Diagnostics,
) -> Option<&'a Resource> {
    let mut candidates: Vec<&Resource> = match exception {
        Some(name) => dataset.resources().iter().filter(|r| r.name == name).collect(),
        None => dataset
            .resources()
            .iter()
            .filter(|r| SPREADSHEET_TYPES.contains(&r.file_type().as_str()))
            .collect(),
    };

    if candidates.len() > 1 {
        candidates.retain(|r| looks_like_gazetteer(r));
    }

    let Some(first) = candidates.first() else {
        diagnostics.warning(dataset.name.as_str(), "Could not find gazetteer");
        return None;
    };
    Some(*first)
}

fn looks_like_gazetteer(resource: &Resource) -> bool {
    let description = resource.description.to_lowercase();
    GAZETTEER_KEYWORDS.iter().any(|k| description.contains(k))
        || TABULAR_NAME.is_match(&resource.name)
}
