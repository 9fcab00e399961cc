pub mod json_lines_report_writer;
pub mod log_report_writer;
