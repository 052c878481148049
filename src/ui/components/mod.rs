pub mod date_input;
pub mod skill_picker;
