use std::cmp::Reverse;
use std::collections::BTreeSet;

use html_escape::encode_text;
use log::debug;

use crate::markup::MarkupController;
use crate::text::{AttributedText, SpanEntry};

/// Serialize `text` to markup that [`import_markup`](crate::markup::import_markup)
/// reads back to the same text and spans.
///
/// Spans are opened in start order, longest first. A span that must close
/// while spans opened after it are still running closes them too, and they
/// are reopened right after. Links are never cut this way: spans that would
/// end inside a link are closed before it opens and reopened within it.
/// Tags are never opened while the importer would still be waiting for
/// closes: the stack is unwound to the depth at which text first appeared,
/// then rebuilt.
pub fn export_markup(text: &AttributedText, controllers: &[&dyn MarkupController]) -> String {
    let mut ranked = Vec::new();
    for entry in text.iter_spans() {
        if entry.is_empty() {
            continue;
        }
        match controllers.iter().position(|c| c.kind() == entry.kind()) {
            Some(rank) => ranked.push((entry, rank)),
            None => debug!("no controller for {}, skipping", entry.style),
        }
    }
    // Equal ranges open in controller order so the output does not depend
    // on insertion order.
    ranked.sort_by(|(a, ra), (b, rb)| {
        a.range
            .start
            .cmp(&b.range.start)
            .then(b.range.end.cmp(&a.range.end))
            .then(ra.cmp(rb))
    });
    let entries: Vec<(&SpanEntry, &dyn MarkupController)> = ranked
        .into_iter()
        .map(|(entry, rank)| (entry, controllers[rank]))
        .collect();

    let mut boundaries = BTreeSet::from([0, text.len()]);
    for (entry, _) in &entries {
        boundaries.insert(entry.range.start);
        boundaries.insert(entry.range.end);
    }
    let boundaries: Vec<usize> = boundaries.into_iter().collect();

    let mut writer = Writer {
        entries: &entries,
        out: String::new(),
        stack: Vec::new(),
        base: None,
        ending: false,
    };
    let mut next = 0;
    for (i, &pos) in boundaries.iter().enumerate() {
        let mut queue = writer.close_ending_at(pos);
        while next < entries.len() && entries[next].0.range.start == pos {
            queue.push(next);
            next += 1;
        }
        writer.open_all(queue);

        if let Some(&end) = boundaries.get(i + 1) {
            writer.text(&text.slice(pos..end));
        }
    }
    writer.out
}

struct Writer<'e, 'a> {
    entries: &'e [(&'a SpanEntry, &'a dyn MarkupController)],
    out: String,
    /// Indices into `entries` of the open tags, innermost last.
    stack: Vec<usize>,
    /// Depth at which the first text was written.
    base: Option<usize>,
    /// Whether the importer would reject an opening tag here.
    ending: bool,
}

impl Writer<'_, '_> {
    fn close_top(&mut self) -> Option<usize> {
        let ix = self.stack.pop()?;
        self.out.push_str(&self.entries[ix].1.close_tag());
        let depth = self.stack.len();
        self.ending = self.base.is_some_and(|base| depth > base);
        Some(ix)
    }

    fn open(&mut self, ix: usize) {
        let (entry, controller) = self.entries[ix];
        self.out.push_str(&controller.open_tag(&entry.style));
        self.stack.push(ix);
    }

    /// Close every span ending at or before `pos`, returning the spans closed
    /// on the way that are still running, outermost first.
    fn close_ending_at(&mut self, pos: usize) -> Vec<usize> {
        let Some(lowest) = self
            .stack
            .iter()
            .position(|&ix| self.entries[ix].0.range.end <= pos)
        else {
            return Vec::new();
        };
        let mut reopen = Vec::new();
        while self.stack.len() > lowest {
            if let Some(ix) = self.close_top()
                && self.entries[ix].0.range.end > pos
            {
                reopen.push(ix);
            }
        }
        reopen.reverse();
        reopen
    }

    fn end(&self, ix: usize) -> usize {
        self.entries[ix].0.range.end
    }

    /// Close the stack down to `depth`, queueing the closed spans to be
    /// reopened ahead of `queue`.
    fn unwind_to(&mut self, depth: usize, queue: &mut Vec<usize>) {
        let mut reopen = Vec::new();
        while self.stack.len() > depth {
            if let Some(ix) = self.close_top() {
                reopen.push(ix);
            }
        }
        reopen.reverse();
        reopen.append(queue);
        *queue = reopen;
    }

    fn open_all(&mut self, mut queue: Vec<usize>) {
        if queue.is_empty() {
            return;
        }
        let unsplittable = queue
            .iter()
            .filter(|&&ix| !self.entries[ix].0.kind().is_mergeable())
            .filter_map(|&ix| {
                let end = self.end(ix);
                self.stack.iter().position(|&open| self.end(open) < end)
            })
            .min();
        if let Some(depth) = unsplittable {
            self.unwind_to(depth, &mut queue);
        }
        if self.ending {
            let base = self.base.unwrap_or(0);
            self.unwind_to(base, &mut queue);
        }
        // Longest first; equal ends keep reopen order, then controller order.
        queue.sort_by_key(|&ix| Reverse(self.end(ix)));
        for ix in queue {
            self.open(ix);
        }
    }

    fn text(&mut self, segment: &str) {
        for (i, line) in segment.split('\n').enumerate() {
            if i > 0 {
                self.out.push_str("<br>");
            }
            if line.is_empty() {
                continue;
            }
            if self.base.is_none() {
                self.base = Some(self.stack.len());
            }
            self.out.push_str(&encode_text(line));
        }
    }
}
