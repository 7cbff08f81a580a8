//! Presentation: turns query, manager and form state into text.
//!
//! Nothing here performs I/O or changes state.

pub mod controls;
pub mod form;
pub mod panel;
pub mod row;

pub use controls::{SelectControl, SelectOption, SkillPill};
pub use form::{render_form, skill_pills};
pub use panel::{panel_content, render_panel, PanelContent};
pub use row::{assignee_options, format_skills, status_options, RowContext, TaskRowView};
