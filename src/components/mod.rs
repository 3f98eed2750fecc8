pub mod cascade_select;
pub mod header;
pub mod result_panel;
pub mod status_badge;
pub mod upload_panel;
