//! Section grouper.
//!
//! Partitions documents by top-level directory into ordered [`Section`]s.
//! Every document lands in exactly one section.

use std::collections::BTreeMap;

use tracing::{debug, instrument};

use agentdocs_shared::{DocFile, ROOT_SECTION, Section, SectionsConfig};

/// Group `docs` into sections.
///
/// Sections follow `config.order`; unlisted ones come after, by id. Within a
/// section the `index` document comes first, the rest sort by path.
#[instrument(skip_all, fields(docs = docs.len()))]
pub fn group_sections(docs: &[DocFile], config: &SectionsConfig, clean_base: &str) -> Vec<Section> {
    let mut buckets: BTreeMap<&str, Vec<DocFile>> = BTreeMap::new();
    for doc in docs {
        buckets.entry(doc.section.as_str()).or_default().push(doc.clone());
    }

    let mut sections: Vec<Section> = buckets
        .into_iter()
        .map(|(id, mut items)| {
            items.sort_by(|a, b| (!a.is_index(), &a.path).cmp(&(!b.is_index(), &b.path)));
            Section {
                id: id.to_string(),
                title: section_title(id, config),
                url: section_url(id, clean_base),
                items,
            }
        })
        .collect();

    sections.sort_by_key(|section| {
        let rank = config
            .order
            .iter()
            .position(|id| *id == section.id)
            .unwrap_or(usize::MAX);
        (rank, section.id.clone())
    });

    debug!(sections = sections.len(), "grouped documents");
    sections
}

/// Display title: configured title, else the title-cased id.
pub fn section_title(id: &str, config: &SectionsConfig) -> String {
    if let Some(title) = config.titles.get(id) {
        return title.clone();
    }

    id.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    format!("{upper}{}", chars.as_str())
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn section_url(id: &str, clean_base: &str) -> String {
    match (id == ROOT_SECTION, clean_base.is_empty()) {
        (true, true) => "/".into(),
        (true, false) => clean_base.into(),
        (false, _) => format!("{clean_base}/{id}"),
    }
}
