//! JSON output formatting

use std::io::{self, Write};

use crate::walk::WalkItem;

use super::{EntrySink, Summary};

/// JSON formatter.
///
/// In array mode items are buffered and written as one pretty-printed
/// array by `finish`. In lines mode every item is written as soon as it
/// arrives, one compact JSON value per line.
pub struct JsonFormatter<W> {
    out: W,
    lines: bool,
    buffered: Vec<WalkItem>,
}

impl JsonFormatter<io::Stdout> {
    pub fn stdout(lines: bool) -> Self {
        Self::new(io::stdout(), lines)
    }
}

impl<W: Write> JsonFormatter<W> {
    pub fn new(out: W, lines: bool) -> Self {
        Self {
            out,
            lines,
            buffered: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> EntrySink for JsonFormatter<W> {
    fn write_item(&mut self, item: &WalkItem) -> io::Result<()> {
        if self.lines {
            serde_json::to_writer(&mut self.out, item).map_err(io::Error::other)?;
            self.out.write_all(b"\n")
        } else {
            self.buffered.push(item.clone());
            Ok(())
        }
    }

    fn finish(&mut self, _summary: &Summary) -> io::Result<()> {
        if !self.lines {
            serde_json::to_writer_pretty(&mut self.out, &self.buffered)
                .map_err(io::Error::other)?;
            self.out.write_all(b"\n")?;
            self.buffered.clear();
        }
        self.out.flush()
    }
}
