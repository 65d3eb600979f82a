//! Single-pass streams over a walk.
//!
//! An `EntryStream` is either pulled straight from a `Traversal` on the
//! reader's thread, or fed through a bounded channel by a walk running in
//! the background. Readers see the same interface either way.

use std::io::{self, Read};

use crossbeam_channel::Receiver;

use crate::error::WalkError;

use super::config::OutputType;
use super::engine::Traversal;
use super::lister::Lister;
use super::materialize::WalkItem;

enum Source<L> {
    Lazy {
        traversal: Traversal<L>,
        output_type: OutputType,
    },
    Channel(Receiver<Result<WalkItem, WalkError>>),
    Closed,
}

/// Forward-only stream of walk items. Closes after the last item or after
/// reporting one error.
pub struct EntryStream<L> {
    source: Source<L>,
    held: Option<WalkError>,
}

impl<L: Lister> EntryStream<L> {
    pub(crate) fn lazy(traversal: Traversal<L>, output_type: OutputType) -> Self {
        Self {
            source: Source::Lazy {
                traversal,
                output_type,
            },
            held: None,
        }
    }

    pub(crate) fn channel(rx: Receiver<Result<WalkItem, WalkError>>) -> Self {
        Self {
            source: Source::Channel(rx),
            held: None,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.source, Source::Closed) && self.held.is_none()
    }

    /// Pull up to `max` items at once.
    ///
    /// An error met after some items were gathered is returned by the
    /// following call, so delivered items always come first.
    pub fn next_chunk(&mut self, max: usize) -> Option<Result<Vec<WalkItem>, WalkError>> {
        let max = max.max(1);
        let mut chunk = Vec::with_capacity(max.min(256));

        while chunk.len() < max {
            match self.next() {
                Some(Ok(item)) => chunk.push(item),
                Some(Err(err)) if chunk.is_empty() => return Some(Err(err)),
                Some(Err(err)) => {
                    self.held = Some(err);
                    break;
                }
                None => break,
            }
        }

        if chunk.is_empty() {
            None
        } else {
            Some(Ok(chunk))
        }
    }

    /// Render the stream as bytes: relative paths separated by `delimiter`.
    pub fn into_text(self, delimiter: u8) -> TextStream<Self> {
        TextStream::new(self, delimiter)
    }
}

impl<L: Lister> Iterator for EntryStream<L> {
    type Item = Result<WalkItem, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.held.take() {
            self.source = Source::Closed;
            return Some(Err(err));
        }

        let next = match &mut self.source {
            Source::Lazy {
                traversal,
                output_type,
            } => {
                let output_type = *output_type;
                traversal
                    .next()
                    .map(|r| r.map(|e| WalkItem::shape(e, output_type)))
            }
            // A disconnected channel means the producer finished.
            Source::Channel(rx) => rx.recv().ok(),
            Source::Closed => None,
        };

        match next {
            Some(Ok(item)) => Some(Ok(item)),
            Some(Err(err)) => {
                self.source = Source::Closed;
                Some(Err(err))
            }
            None => {
                self.source = Source::Closed;
                None
            }
        }
    }
}

/// `io::Read` adapter writing each item's relative path, separated by a
/// delimiter byte. A walk error surfaces as an `io::Error` wrapping it.
pub struct TextStream<I> {
    items: I,
    delimiter: u8,
    buf: Vec<u8>,
    pos: usize,
    started: bool,
    done: bool,
}

impl<I> TextStream<I>
where
    I: Iterator<Item = Result<WalkItem, WalkError>>,
{
    pub fn new(items: I, delimiter: u8) -> Self {
        Self {
            items,
            delimiter,
            buf: Vec::new(),
            pos: 0,
            started: false,
            done: false,
        }
    }

    fn refill(&mut self) -> io::Result<bool> {
        if self.done {
            return Ok(false);
        }
        match self.items.next() {
            Some(Ok(item)) => {
                self.buf.clear();
                self.pos = 0;
                if self.started {
                    self.buf.push(self.delimiter);
                }
                self.started = true;
                self.buf.extend_from_slice(item.relative_path().as_bytes());
                Ok(true)
            }
            Some(Err(err)) => {
                self.done = true;
                Err(io::Error::other(err))
            }
            None => {
                self.done = true;
                Ok(false)
            }
        }
    }
}

impl<I> Read for TextStream<I>
where
    I: Iterator<Item = Result<WalkItem, WalkError>>,
{
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if out.is_empty() {
            return Ok(0);
        }
        while self.pos >= self.buf.len() {
            if !self.refill()? {
                return Ok(0);
            }
        }
        let n = (self.buf.len() - self.pos).min(out.len());
        out[..n].copy_from_slice(&self.buf[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}
