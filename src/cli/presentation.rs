//! CLI presentation: text and json formatters per command family.

mod analysis;
mod blueprint;
mod shared;
mod status;

pub use analysis::format_analysis_text;
pub use blueprint::format_blueprint_text;
pub use shared::{format_section_heading, to_json};
pub use status::{format_status_text, StatusReport};
