//! Splits an assembled report into chat-sized chunks.
//!
//! The delivery channel caps message length, so an oversized report is
//! split on line boundaries. Every emitted chunk must render correctly on
//! its own: lines are never cut in half, and a chunk that ends inside a
//! literal block is closed there and the block reopened at the start of the
//! next chunk.

use crate::message::FENCE;

/// Splits `message` into ordered chunks of at most `budget` bytes.
///
/// A single line longer than the budget is emitted alone as an oversized
/// chunk rather than being truncated; that is the one documented case where
/// a chunk may exceed the budget.
pub fn split_message(message: &str, budget: usize) -> Vec<String> {
    if message.len() <= budget {
        return vec![message.to_string()];
    }

    let mut splitter = Splitter::new(budget);
    for line in message.lines() {
        splitter.push_line(line);
    }
    splitter.finish()
}

/// Line-by-line accumulator. `in_block` tracks the logical fence state of
/// the source message; fences injected to rebalance a chunk do not toggle
/// it. `has_lines` tracks whether the current chunk holds at least one
/// line: a blank line is a line too, and `current.is_empty()` cannot tell
/// the two apart.
struct Splitter {
    budget: usize,
    current: String,
    has_lines: bool,
    in_block: bool,
    chunks: Vec<String>,
}

impl Splitter {
    fn new(budget: usize) -> Self {
        Self {
            budget,
            current: String::new(),
            has_lines: false,
            in_block: false,
            chunks: Vec::new(),
        }
    }

    fn push_line(&mut self, line: &str) {
        let toggles = line.trim() == FENCE;
        let in_block_after = self.in_block ^ toggles;

        // Project the chunk length with this line appended, reserving room
        // for the closing fence we would inject if the chunk ended inside a
        // block.
        let separator = usize::from(self.has_lines);
        let reserve = if in_block_after { FENCE.len() + 1 } else { 0 };
        let projected = self.current.len() + separator + line.len() + reserve;

        // Never flush a buffer holding only a blank line: the chunk would
        // be the empty string and the blank line would vanish. It rides
        // along with the next line instead.
        if !self.current.is_empty() && projected > self.budget {
            self.flush();
        }
        if self.has_lines {
            self.current.push('\n');
        }
        self.current.push_str(line);
        self.has_lines = true;
        self.in_block = in_block_after;
    }

    /// Emits the current chunk. When the split point falls inside a literal
    /// block, the chunk is closed with a fence and the next chunk starts
    /// with a reopening fence.
    fn flush(&mut self) {
        let mut chunk = std::mem::take(&mut self.current);
        self.has_lines = false;
        if self.in_block {
            chunk.push('\n');
            chunk.push_str(FENCE);
            self.current.push_str(FENCE);
            self.has_lines = true;
        }
        self.chunks.push(chunk);
    }

    fn finish(mut self) -> Vec<String> {
        if self.has_lines {
            let mut chunk = std::mem::take(&mut self.current);
            // A balanced source message always ends outside a block; close
            // the fence anyway if the input was malformed.
            if self.in_block {
                chunk.push('\n');
                chunk.push_str(FENCE);
            }
            self.chunks.push(chunk);
        }
        self.chunks
    }
}
