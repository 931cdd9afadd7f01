use std::fmt;
use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

/// Anchor token for sayings whose title has no usable characters.
pub const DEFAULT_SLUG: &str = "saying";

const STYLESHEET: &str = "body{font-family:serif;max-width:40rem;margin:2rem auto;padding:0 1rem;line-height:1.5;}h1,h2,h3{text-align:center;}h3{text-align:left;margin-top:2rem;}p{margin:0.4rem 0;}p.preface{font-style:italic;}hr{margin:2rem 0;border:0;border-top:1px solid #ccc;}";

/// Lowercase, collapse every run outside `[a-z0-9]` into one hyphen and trim hyphens.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    match slug.trim_matches('-') {
        "" => DEFAULT_SLUG.to_string(),
        s => s.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Paragraph {
    pub lines: Vec<String>,
}

impl Paragraph {
    pub fn text(&self) -> String {
        self.lines.join("<br>")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Saying {
    pub number: usize,
    pub title: String,
    pub paragraphs: Vec<Paragraph>,
}

impl Saying {
    pub fn anchor(&self) -> String {
        format!("s{}-{}", self.number, slugify(&self.title))
    }

    fn html(&self) -> String {
        let mut out = format!(
            "<h3 id=\"{}\">{}. {}</h3>",
            self.anchor(),
            self.number,
            self.title
        );
        for p in &self.paragraphs {
            out.push_str(&format!("\n<p>{}</p>", p.text()));
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Book {
    pub title: String,
    pub preface: Vec<Paragraph>,
    pub sayings: Vec<Saying>,
}

impl Book {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Default::default()
        }
    }

    fn html(&self) -> String {
        let mut parts = Vec::new();
        if !self.title.is_empty() {
            parts.push(format!("<h2>{}</h2>", self.title));
        }
        parts.extend(
            self.preface
                .iter()
                .map(|p| format!("<p class=\"preface\">{}</p>", p.text())),
        );
        parts.extend(self.sayings.iter().map(Saying::html));
        parts.push("<hr>".to_string());
        parts.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub books: Vec<Book>,
}

impl Document {
    pub fn sayings(&self) -> impl Iterator<Item = &Saying> {
        self.books.iter().flat_map(|b| b.sayings.iter())
    }

    /// Standalone page; `fallback_title` names it when no title page was found
    pub fn page<'a>(&'a self, fallback_title: &'a str) -> HtmlPage<'a> {
        HtmlPage {
            doc: self,
            fallback_title,
        }
    }

    pub fn to_html<P: AsRef<Path>>(&self, file: P, fallback_title: &str) -> std::io::Result<()> {
        let mut f = File::create(file)?;
        write!(f, "{}", self.page(fallback_title))?;
        Ok(())
    }
}

pub struct HtmlPage<'a> {
    doc: &'a Document,
    fallback_title: &'a str,
}

impl fmt::Display for HtmlPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let title = self
            .doc
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(self.fallback_title);
        writeln!(
            f,
            r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <style>{style}</style>
</head>
<body>
<h1>{title}</h1>"#,
            style = STYLESHEET
        )?;
        if let Some(sub) = self.doc.subtitle.as_deref().filter(|s| !s.is_empty()) {
            writeln!(f, "<h2>{sub}</h2>")?;
        }
        for b in &self.doc.books {
            writeln!(f, "{}", b.html())?;
        }
        write!(f, "</body>\n</html>\n")
    }
}
