use crate::{
    components::{clean_line, first_braced, textsc_all},
    syntax::*,
    tokenizer::{get_tokens, Token, TokenType},
};
use std::convert::Infallible;
use std::str::FromStr;
use tracing::{debug, trace};

pub const DEFAULT_SUBTITLE_PHRASES: [&str; 3] = [
    "The 81 Sayings of",
    "Book of Awakening",
    "Suttas of the Living Buddha",
];

#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    /// A title-page line containing any of these carries the subtitle
    pub subtitle_phrases: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            subtitle_phrases: DEFAULT_SUBTITLE_PHRASES.map(String::from).to_vec(),
        }
    }
}

impl ParseOptions {
    pub fn with_phrases<I: IntoIterator<Item = String>>(mut self, phrases: I) -> Self {
        self.subtitle_phrases.extend(phrases);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Zone {
    FrontMatter,
    TitlePage { from_main: bool },
    MainMatter,
    Terminated,
}

/// Single pass over the tokens of one source file.
struct DocumentBuilder<'a, 'o> {
    options: &'o ParseOptions,
    zone: Zone,
    title: Option<String>,
    subtitle: Option<String>,
    books: Vec<Book>,
    current: Option<Book>,
    pending: Vec<&'a str>,
    say_num: usize,
}

impl<'a, 'o> DocumentBuilder<'a, 'o> {
    fn new(options: &'o ParseOptions) -> Self {
        Self {
            options,
            zone: Zone::FrontMatter,
            title: None,
            subtitle: None,
            books: Vec::new(),
            current: None,
            pending: Vec::new(),
            say_num: 0,
        }
    }

    fn enter(&mut self, zone: Zone) {
        trace!(from = ?self.zone, to = ?zone, "zone change");
        self.zone = zone;
    }

    fn feed(&mut self, token: Token<'a>) {
        match self.zone {
            Zone::Terminated => (),
            Zone::TitlePage { from_main } => match token.ty {
                TokenType::EndTitlePage => self.enter(if from_main {
                    Zone::MainMatter
                } else {
                    Zone::FrontMatter
                }),
                _ => self.scan_title_page(token.content),
            },
            Zone::FrontMatter => match token.ty {
                TokenType::BeginTitlePage => self.enter(Zone::TitlePage { from_main: false }),
                TokenType::MainMatter => self.enter(Zone::MainMatter),
                _ => (),
            },
            Zone::MainMatter => match token.ty {
                TokenType::BeginTitlePage => self.enter(Zone::TitlePage { from_main: true }),
                TokenType::BackMatter => self.enter(Zone::Terminated),
                TokenType::Chapter(title) => self.open_book(title),
                TokenType::Section(title) => self.open_saying(title),
                // ornaments separate paragraphs without adding text
                TokenType::Ornament => self.accumulate(""),
                TokenType::Blank | TokenType::Text => self.accumulate(token.content),
                TokenType::EndTitlePage | TokenType::MainMatter => (),
            },
        }
    }

    fn scan_title_page(&mut self, line: &str) {
        if line.contains("\\Huge") && line.contains("textsc") {
            if let Ok((_, parts)) = textsc_all(line) {
                if !parts.is_empty() {
                    self.title = non_empty(parts.join(" "));
                }
            }
        }
        if self
            .options
            .subtitle_phrases
            .iter()
            .any(|p| line.contains(p.as_str()))
        {
            if let Ok((_, sub)) = first_braced(line) {
                self.subtitle = non_empty(sub.trim().to_string());
            }
        }
    }

    fn accumulate(&mut self, line: &'a str) {
        if self.current.is_some() {
            self.pending.push(line);
        }
    }

    /// Moves pending lines into the open saying, or the book preface if none is open
    fn flush(&mut self) {
        let paragraphs = paragraphs(&self.pending);
        self.pending.clear();
        if paragraphs.is_empty() {
            return;
        }
        if let Some(book) = self.current.as_mut() {
            match book.sayings.last_mut() {
                Some(saying) => saying.paragraphs.extend(paragraphs),
                None => book.preface.extend(paragraphs),
            }
        }
    }

    fn open_book(&mut self, title: &str) {
        self.flush();
        if let Some(book) = self.current.take() {
            self.books.push(book);
        }
        debug!(title, "book");
        self.current = Some(Book::new(title));
    }

    fn open_saying(&mut self, title: &str) {
        self.flush();
        self.say_num += 1;
        debug!(number = self.say_num, title, "saying");
        let saying = Saying {
            number: self.say_num,
            title: title.to_string(),
            paragraphs: Vec::new(),
        };
        self.current
            .get_or_insert_with(|| Book::new(""))
            .sayings
            .push(saying);
    }

    fn finish(mut self) -> Document {
        self.flush();
        if let Some(book) = self.current.take() {
            self.books.push(book);
        }
        Document {
            title: self.title,
            subtitle: self.subtitle,
            books: self.books,
        }
    }
}

/// Empty captures count as absent, and still clear an earlier match
fn non_empty(s: String) -> Option<String> {
    (!s.trim().is_empty()).then_some(s)
}

/// Splits buffered lines on blank lines; paragraphs with no text are dropped
pub fn paragraphs(lines: &[&str]) -> Vec<Paragraph> {
    lines
        .split(|l| l.trim().is_empty())
        .filter_map(|chunk| {
            let mut lines: Vec<String> = chunk.iter().map(|l| clean_line(l)).collect();
            if let Some(first) = lines.first_mut() {
                *first = first.trim_start().to_string();
            }
            if lines.iter().all(|l| l.is_empty()) {
                None
            } else {
                Some(Paragraph { lines })
            }
        })
        .collect()
}

pub fn parse_document(txt: &str, options: &ParseOptions) -> Document {
    let mut builder = DocumentBuilder::new(options);
    for token in get_tokens(txt) {
        builder.feed(token);
        if builder.zone == Zone::Terminated {
            break;
        }
    }
    builder.finish()
}

impl FromStr for Document {
    type Err = Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(parse_document(s, &ParseOptions::default()))
    }
}
