use crate::components::{directive, LineRes};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::multispace0,
    combinator::{eof, rest, value},
    sequence::{delimited, preceded, terminated},
    Parser,
};

#[derive(Clone, PartialEq, Debug, Copy)]
pub struct Token<'a> {
    pub ty: TokenType<'a>,
    pub content: &'a str,
}

impl<'a> Token<'a> {
    fn new(ty: TokenType<'a>, content: &'a str) -> Self {
        Self { ty, content }
    }
}

#[derive(Clone, PartialEq, Debug, Copy)]
pub enum TokenType<'a> {
    BeginTitlePage,
    EndTitlePage,
    MainMatter,
    BackMatter,
    Chapter(&'a str),
    Section(&'a str),
    Ornament,
    Blank,
    Text,
}

fn marker<'a>(
    ty: TokenType<'a>,
    text: &'static str,
) -> impl Parser<&'a str, Output = TokenType<'a>, Error = nom::error::Error<&'a str>> {
    value(ty, preceded(multispace0, tag(text)))
}

fn chapter(i: &str) -> LineRes<'_, TokenType<'_>> {
    let (remaining, title) = directive("chapter").parse(i)?;
    Ok((remaining, TokenType::Chapter(title.trim())))
}

fn section(i: &str) -> LineRes<'_, TokenType<'_>> {
    let (remaining, title) = directive("section").parse(i)?;
    Ok((remaining, TokenType::Section(title.trim())))
}

fn ornament(i: &str) -> LineRes<'_, TokenType<'_>> {
    value(
        TokenType::Ornament,
        delimited(multispace0, tag("\\ornament"), terminated(multispace0, eof)),
    )
    .parse(i)
}

fn blank(i: &str) -> LineRes<'_, TokenType<'_>> {
    value(TokenType::Blank, terminated(multispace0, eof)).parse(i)
}

fn line_type(i: &str) -> LineRes<'_, TokenType<'_>> {
    alt((
        marker(TokenType::BeginTitlePage, "\\begin{titlepage}"),
        marker(TokenType::EndTitlePage, "\\end{titlepage}"),
        marker(TokenType::MainMatter, "\\mainmatter"),
        marker(TokenType::BackMatter, "% --- BACK MATTER ---"),
        chapter,
        section,
        ornament,
        blank,
        value(TokenType::Text, rest),
    ))
    .parse(i)
}

pub fn classify(line: &str) -> Token<'_> {
    let ty = line_type(line).map_or(TokenType::Text, |(_, ty)| ty);
    Token::new(ty, line)
}

pub fn get_tokens(txt: &str) -> Vec<Token<'_>> {
    txt.lines().map(classify).collect()
}
