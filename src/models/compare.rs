use serde::ser::{ Serialize, SerializeMap, Serializer };

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComparisonEntry {
    pub model: String,
    pub reply: String,
}

/// Replies keyed by model, kept in the order the models were requested.
///
/// Serializes as a JSON object whose keys follow that order, so a reader that
/// walks the object sees the same sequence as the request list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComparisonResult {
    entries: Vec<ComparisonEntry>,
}

impl ComparisonResult {
    pub fn new(entries: Vec<ComparisonEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ComparisonEntry] {
        &self.entries
    }

    pub fn get(&self, model: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.model == model)
            .map(|e| e.reply.as_str())
    }

    pub fn models(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.model.as_str()).collect()
    }

    /// `model: reply` lines, one per entry.
    pub fn to_lines(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{}: {}", e.model, e.reply))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Serialize for ComparisonResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.model, &entry.reply)?;
        }
        map.end()
    }
}
