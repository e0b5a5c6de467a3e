// `errors`: entries of the last load that did not parse

use super::table::Table;
use crate::config::DisplaySection;
use crate::session::Session;
use std::io::{self, Write};

pub(super) fn render(session: &Session, display: &DisplaySection, out: &mut dyn Write) -> io::Result<()> {
    let failures = session.failures();
    if failures.is_empty() {
        writeln!(
            out,
            "All JSON entries in {} parsed successfully",
            session.archive_path().display()
        )?;
    } else {
        let mut table = Table::new(&["Entry", "Reason"]).max_width(display.max_column_width);
        for failure in failures {
            table.add_row(vec![failure.entry.clone(), failure.error.to_string()]);
        }
        table.render(out)?;
    }
    if session.skipped() > 0 {
        writeln!(out, "{} non-JSON entries were skipped", session.skipped())?;
    }
    Ok(())
}
