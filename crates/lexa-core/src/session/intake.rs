//! Intake wizard session state.
//!
//! A linear five-step questionnaire for company formation. The step cursor
//! moves one step at a time through `next_step`/`prev_step`, clamped to the
//! wizard bounds; `set_step` is a direct set so navigation can jump anywhere.

use serde::{Deserialize, Serialize};

/// First wizard step.
pub const MIN_STEP: u8 = 1;
/// Last wizard step.
pub const MAX_STEP: u8 = 5;

/// Collected intake answers.
///
/// The shape is fixed: merges only ever fill fields in, the record is never
/// replaced wholesale, so no field can go missing mid-session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Questionnaire {
    /// Kind of activity (e.g. "conseil", "e-commerce").
    pub activity_type: String,
    /// Free-form description of the planned activity.
    pub activity_description: String,
    pub founders_count: u32,
    /// Planned share capital, in euros.
    pub planned_capital: u64,
    /// Whether the founders plan to raise funds.
    pub seeks_funding: bool,
    /// Whether an exit (sale) is planned.
    pub plans_exit: bool,
    /// Whether personal-asset protection matters to the founders.
    pub wants_asset_protection: bool,
    pub employee_count: u32,
}

impl Default for Questionnaire {
    fn default() -> Self {
        Self {
            activity_type: String::new(),
            activity_description: String::new(),
            founders_count: 1,
            planned_capital: 0,
            seeks_funding: false,
            plans_exit: false,
            wants_asset_protection: false,
            employee_count: 0,
        }
    }
}

/// A partial questionnaire update.
///
/// Each operation lists exactly the fields it touches; `None` fields are
/// left as they were.
#[derive(Debug, Clone, Default)]
pub struct QuestionnairePatch {
    pub activity_type: Option<String>,
    pub activity_description: Option<String>,
    pub founders_count: Option<u32>,
    pub planned_capital: Option<u64>,
    pub seeks_funding: Option<bool>,
    pub plans_exit: Option<bool>,
    pub wants_asset_protection: Option<bool>,
    pub employee_count: Option<u32>,
}

/// Intake wizard session store.
#[derive(Debug, Clone)]
pub struct IntakeState {
    /// Wizard cursor; `next_step`/`prev_step` keep it in [MIN_STEP, MAX_STEP].
    pub step: u8,
    pub country: String,
    pub questionnaire: Questionnaire,
    /// Analysis result buffer; streamed chunks accumulate here.
    pub result: String,
    pub loading: bool,
    pub current_tool: Option<String>,
    pub error: Option<String>,
}

impl Default for IntakeState {
    fn default() -> Self {
        Self {
            step: MIN_STEP,
            country: String::new(),
            questionnaire: Questionnaire::default(),
            result: String::new(),
            loading: false,
            current_tool: None,
            error: None,
        }
    }
}

impl IntakeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the step directly, without clamping.
    ///
    /// Direct jumps (e.g. from navigation) are allowed to leave the
    /// [MIN_STEP, MAX_STEP] range; only relative moves enforce the bounds.
    pub fn set_step(&mut self, step: u8) {
        self.step = step;
    }

    /// Advances one step, clamped at `MAX_STEP`.
    pub fn next_step(&mut self) {
        self.step = self.step.saturating_add(1).min(MAX_STEP);
    }

    /// Goes back one step, clamped at `MIN_STEP`.
    pub fn prev_step(&mut self) {
        self.step = self.step.saturating_sub(1).max(MIN_STEP);
    }

    pub fn set_country(&mut self, country: impl Into<String>) {
        self.country = country.into();
    }

    /// Merges the patch into the questionnaire. Additive only.
    pub fn update_questionnaire(&mut self, patch: QuestionnairePatch) {
        let q = &mut self.questionnaire;
        if let Some(v) = patch.activity_type {
            q.activity_type = v;
        }
        if let Some(v) = patch.activity_description {
            q.activity_description = v;
        }
        if let Some(v) = patch.founders_count {
            q.founders_count = v;
        }
        if let Some(v) = patch.planned_capital {
            q.planned_capital = v;
        }
        if let Some(v) = patch.seeks_funding {
            q.seeks_funding = v;
        }
        if let Some(v) = patch.plans_exit {
            q.plans_exit = v;
        }
        if let Some(v) = patch.wants_asset_protection {
            q.wants_asset_protection = v;
        }
        if let Some(v) = patch.employee_count {
            q.employee_count = v;
        }
    }

    /// Replaces the result buffer.
    pub fn set_result(&mut self, result: impl Into<String>) {
        self.result = result.into();
    }

    /// Appends a streamed chunk to the result buffer.
    pub fn append_result(&mut self, chunk: &str) {
        self.result.push_str(chunk);
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_current_tool(&mut self, tool: Option<String>) {
        self.current_tool = tool;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    /// Restores every field to its initial value, including the default
    /// questionnaire.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
