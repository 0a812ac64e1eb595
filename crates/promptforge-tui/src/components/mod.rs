pub mod copy_button;
pub mod text_panel;
