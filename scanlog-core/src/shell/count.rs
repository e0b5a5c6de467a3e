use crate::filter::FilterSet;
use crate::session::Session;
use std::io::{self, Write};

pub(super) fn render(session: &Session, filters: &FilterSet, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "Total records: {}", session.len())?;
    if !filters.is_empty() {
        let matching = filters.count(session.records());
        writeln!(out, "Matching records: {} ({})", matching, filters)?;
    }
    Ok(())
}
