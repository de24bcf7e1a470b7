mod export;

pub use export::{parse_report, render_report, write_report, REPORT_HEADER};
