use nom::{
    bytes::complete::{tag, take_till, take_until},
    multi::many0,
    sequence::{delimited, preceded},
    IResult, Parser,
};

pub type LineRes<'a, T> = IResult<&'a str, T>;

/// Brace-delimited argument, `{...}`, without nested closing braces
pub fn braced(inp: &str) -> LineRes<'_, &str> {
    delimited(tag("{"), take_till(|c| c == '}'), tag("}")).parse(inp)
}

/// `\name{arg}` at the start of the input, yielding `arg`
pub fn directive<'a>(
    name: &'static str,
) -> impl Parser<&'a str, Output = &'a str, Error = nom::error::Error<&'a str>> {
    preceded((tag("\\"), tag(name)), braced)
}

/// Every `\textsc{...}` argument in the line, in order
pub fn textsc_all(inp: &str) -> LineRes<'_, Vec<&str>> {
    many0(preceded(take_until("\\textsc{"), directive("textsc"))).parse(inp)
}

/// The first `{...}` group anywhere in the line
pub fn first_braced(inp: &str) -> LineRes<'_, &str> {
    preceded(take_till(|c| c == '{'), braced).parse(inp)
}

/// Drops a trailing `\\` and the whitespace around it
pub fn strip_linebreak(line: &str) -> &str {
    let line = line.trim_end();
    line.strip_suffix("\\\\").unwrap_or(line).trim_end()
}

pub fn normalize_quotes(line: &str) -> String {
    line.replace("``", "\"").replace("''", "\"")
}

/// Cleaned paragraph line: linebreak stripped and quotes normalized
pub fn clean_line(line: &str) -> String {
    normalize_quotes(strip_linebreak(line))
}
