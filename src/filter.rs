use crate::loader::Dataset;
use crate::types::VisitorRecord;

/// Which visitor types currently pass the filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSelection {
    selected: Vec<String>,
}

impl FilterSelection {
    /// Every visitor type observed in the dataset; the dashboard default.
    pub fn all(dataset: &Dataset) -> Self {
        FilterSelection {
            selected: dataset.visitor_types(),
        }
    }

    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selected: Vec<String> = Vec::new();
        for t in types {
            let t = t.into();
            if !selected.contains(&t) {
                selected.push(t);
            }
        }
        FilterSelection { selected }
    }

    /// Parse a comma separated list typed at the prompt. Blank entries are
    /// dropped, so an empty line selects nothing.
    pub fn parse(input: &str) -> Self {
        FilterSelection::new(
            input
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty()),
        )
    }

    pub fn contains(&self, visitor_type: &str) -> bool {
        self.selected.iter().any(|t| t == visitor_type)
    }

    pub fn types(&self) -> &[String] {
        &self.selected
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

/// Keep only records whose visitor type is selected. An empty selection lets
/// nothing through.
pub fn filter_by_visitor_types(
    records: &[VisitorRecord],
    selection: &FilterSelection,
) -> Vec<VisitorRecord> {
    records
        .iter()
        .filter(|r| selection.contains(&r.visitor_type))
        .cloned()
        .collect()
}
