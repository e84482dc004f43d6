pub mod alert;
pub mod date_format;
pub mod handler_404;
pub mod path_segment;
