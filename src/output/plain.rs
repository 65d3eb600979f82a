//! Plain text output
//!
//! Writes each path followed by the configured delimiter. Entry records are
//! colored by type, and with `show_types` each line starts with the type
//! label.

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::entry::EntryType;
use crate::walk::WalkItem;

use super::config::OutputConfig;
use super::{EntrySink, Summary};

/// Widest type label, for aligning paths after it.
const LABEL_WIDTH: usize = 7;

pub struct PlainFormatter<W> {
    config: OutputConfig,
    out: W,
}

impl PlainFormatter<StandardStream> {
    /// Formatter writing to stdout. Color detection is the caller's job;
    /// `use_color` is taken as final.
    pub fn stdout(config: OutputConfig) -> Self {
        let choice = if config.use_color {
            ColorChoice::Always
        } else {
            ColorChoice::Never
        };
        Self {
            config,
            out: StandardStream::stdout(choice),
        }
    }
}

impl<W: WriteColor> PlainFormatter<W> {
    pub fn new(config: OutputConfig, out: W) -> Self {
        Self { config, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn color_for(entry_type: EntryType) -> Option<ColorSpec> {
    let mut spec = ColorSpec::new();
    match entry_type {
        EntryType::Directory => spec.set_fg(Some(Color::Blue)).set_bold(true),
        EntryType::Symlink => spec.set_fg(Some(Color::Cyan)),
        EntryType::Socket | EntryType::Fifo => spec.set_fg(Some(Color::Magenta)),
        EntryType::BlockDevice | EntryType::CharDevice => {
            spec.set_fg(Some(Color::Yellow)).set_bold(true)
        }
        EntryType::File | EntryType::Unknown => return None,
    };
    Some(spec)
}

impl<W: WriteColor> EntrySink for PlainFormatter<W> {
    fn write_item(&mut self, item: &WalkItem) -> io::Result<()> {
        match item {
            WalkItem::Path(path) => {
                self.out.write_all(path.as_bytes())?;
            }
            WalkItem::Entry(entry) => {
                if self.config.show_types {
                    write!(
                        self.out,
                        "{:<width$} ",
                        entry.entry_type().label(),
                        width = LABEL_WIDTH
                    )?;
                }
                if let Some(spec) = color_for(entry.entry_type()) {
                    self.out.set_color(&spec)?;
                    self.out.write_all(entry.relative_path().as_bytes())?;
                    self.out.reset()?;
                } else {
                    self.out.write_all(entry.relative_path().as_bytes())?;
                }
            }
        }
        self.out.write_all(&self.config.delimiter)
    }

    fn finish(&mut self, summary: &Summary) -> io::Result<()> {
        if self.config.summary {
            writeln!(self.out)?;
            if summary.untyped > 0 {
                writeln!(self.out, "{} entries", summary.untyped)?;
            } else {
                writeln!(
                    self.out,
                    "{} directories, {} files, {} other",
                    summary.dirs, summary.files, summary.other
                )?;
            }
        }
        self.out.flush()
    }
}
