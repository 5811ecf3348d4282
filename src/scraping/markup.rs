// Streams an HTML document as a flat sequence of tag and text events.
//
// The html5ever tokenizer runs without a tree builder, so consumers see the
// tags exactly as written: nothing is implied, reordered or closed for them.
// Consecutive character tokens are merged into one text event, which ends at
// the next tag, comment or doctype.

use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use tracing::debug;

use crate::error::ScrapeError;

/// Receiver of markup events, in document order.
pub trait MarkupSink {
    fn start_tag(&mut self, name: &str) -> Result<(), ScrapeError>;
    fn end_tag(&mut self, name: &str) -> Result<(), ScrapeError>;
    fn text(&mut self, text: &str) -> Result<(), ScrapeError>;
}

/// Adapts a [`MarkupSink`] to the tokenizer. The tokenizer only hands out
/// shared references, hence the cells.
struct EventPump<'a, S> {
    sink: RefCell<&'a mut S>,
    strict: bool,
    pending: RefCell<String>,
    tolerated: RefCell<Vec<String>>,
    failure: RefCell<Option<ScrapeError>>,
}

impl<'a, S: MarkupSink> EventPump<'a, S> {
    fn new(sink: &'a mut S, strict: bool) -> Self {
        Self {
            sink: RefCell::new(sink),
            strict,
            pending: RefCell::new(String::new()),
            tolerated: RefCell::new(Vec::new()),
            failure: RefCell::new(None),
        }
    }

    /// Deliver one event unless an earlier one already failed.
    fn deliver(&self, event: impl FnOnce(&mut S) -> Result<(), ScrapeError>) {
        if self.failure.borrow().is_some() {
            return;
        }
        let result = {
            let mut sink = self.sink.borrow_mut();
            event(&mut **sink)
        };
        if let Err(err) = result {
            *self.failure.borrow_mut() = Some(err);
        }
    }

    fn flush_text(&self) {
        let text = std::mem::take(&mut *self.pending.borrow_mut());
        if !text.is_empty() {
            self.deliver(|sink| sink.text(&text));
        }
    }

    fn finish(self) -> Result<(), ScrapeError> {
        if let Some(err) = self.failure.into_inner() {
            return Err(err);
        }
        let tolerated = self.tolerated.into_inner();
        if let Some(first) = tolerated.first() {
            debug!(count = tolerated.len(), first = %first, "Tolerating markup errors");
        }
        Ok(())
    }
}

/// Elements whose content the tokenizer must read as raw text rather than
/// as markup.
fn raw_content(name: &str) -> Option<RawKind> {
    match name {
        "script" => Some(RawKind::ScriptData),
        "style" => Some(RawKind::Rawtext),
        "title" | "textarea" => Some(RawKind::Rcdata),
        _ => None,
    }
}

impl<S: MarkupSink> TokenSink for EventPump<'_, S> {
    type Handle = ();

    fn process_token(&self, token: Token, line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::CharacterTokens(chars) => self.pending.borrow_mut().push_str(&chars),
            Token::NullCharacterToken => {}
            Token::TagToken(tag) => {
                self.flush_text();
                let name: &str = &tag.name;
                match tag.kind {
                    TagKind::StartTag => {
                        self.deliver(|sink| sink.start_tag(name));
                        if !tag.self_closing {
                            if let Some(kind) = raw_content(name) {
                                return TokenSinkResult::RawData(kind);
                            }
                        }
                    }
                    TagKind::EndTag => self.deliver(|sink| sink.end_tag(name)),
                }
            }
            Token::ParseError(message) => {
                if self.strict {
                    self.flush_text();
                    self.deliver(|_| {
                        Err(ScrapeError::MarkupParse(format!(
                            "line {line_number}: {message}"
                        )))
                    });
                } else {
                    self.tolerated
                        .borrow_mut()
                        .push(format!("line {line_number}: {message}"));
                }
            }
            Token::CommentToken(_) | Token::DoctypeToken(_) | Token::EOFToken => self.flush_text(),
        }
        TokenSinkResult::Continue
    }
}

/// Tokenize `document` and feed its events into `sink`.
///
/// With `strict` set, the first tokenizer error aborts with
/// [`ScrapeError::MarkupParse`]. Otherwise the tokenizer's recovery is
/// accepted and the errors are only logged. A failing sink stops delivery
/// and its error is returned.
pub fn replay<S: MarkupSink>(document: &str, strict: bool, sink: &mut S) -> Result<(), ScrapeError> {
    let tokenizer = Tokenizer::new(EventPump::new(sink, strict), TokenizerOpts::default());

    let input = BufferQueue::default();
    input.push_back(StrTendril::from(document));
    let _ = tokenizer.feed(&input);
    tokenizer.end();

    tokenizer.sink.finish()
}
