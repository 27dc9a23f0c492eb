//! Scoped survey prompt injection.

use ccore::{ChatEntry, Transcript};

/// Appends a survey prompt to every lane and removes it again when
/// dropped.
///
/// While the scope is open the lanes can only be read, so the real
/// transcripts are back in their prior state once it closes, on error
/// paths too.
pub struct SurveyScope<'a> {
    lanes: &'a mut [Transcript],
}

impl<'a> SurveyScope<'a> {
    /// Push `prompt` onto every lane.
    pub fn open(lanes: &'a mut [Transcript], prompt: ChatEntry) -> Self {
        for lane in lanes.iter_mut() {
            lane.push(prompt.clone());
        }
        Self { lanes }
    }

    /// The lanes, each ending with the survey prompt.
    pub fn lanes(&self) -> &[Transcript] {
        self.lanes
    }
}

impl Drop for SurveyScope<'_> {
    fn drop(&mut self) {
        for lane in self.lanes.iter_mut() {
            lane.pop();
        }
    }
}
