use serde::Deserialize;

/// Ordered step outcomes from one agent run. Only the latest terminal step's
/// extracted text matters to callers; everything else is diagnostic.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RunHistory {
    #[serde(default)]
    pub steps: Vec<HistoryStep>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct HistoryStep {
    #[serde(default)]
    pub is_done: bool,
    #[serde(default)]
    pub extracted_content: Option<String>,
}

impl RunHistory {
    /// Text of the most recent terminal step, scanning newest to oldest.
    /// Steps that are terminal but carry no text are skipped.
    pub fn final_result(&self) -> Option<&str> {
        self.steps.iter().rev().find_map(|step| {
            if !step.is_done {
                return None;
            }
            step.extracted_content.as_deref().filter(|text| !text.is_empty())
        })
    }
}
