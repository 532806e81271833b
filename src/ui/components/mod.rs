pub mod input_dialog;
pub mod status_bar;
pub mod tabs;
