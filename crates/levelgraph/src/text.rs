//! Line-oriented level text format.
//!
//! ```text
//! Start--Hall
//! Hall->Boss # angle:30 strength:0.5
//! Hall>>Start
//! Lever*>Hall
//!
//! #Start pos:(0,0) type:start
//! #Boss pos:(4.5,-2) type:boss weight:2
//! ```
//!
//! Edge lines create their endpoints on first mention. Vertex lines (`#name ...`) override the
//! type, position, and weight of a vertex; any field may be omitted. Malformed lines are
//! skipped and reported as [`Diagnostic`]s.

use crate::error::{Error, Result};
use crate::graph::{EdgeKind, Graph, Position, VertexKind};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::warn;

#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    pub strict: bool,
}

impl ParseOptions {
    /// The first malformed line fails the whole parse.
    pub fn strict() -> Self {
        Self { strict: true }
    }

    /// Malformed lines are skipped and collected as diagnostics.
    pub fn lenient() -> Self {
        Self { strict: false }
    }
}

/// A recoverable problem found while parsing. `line` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl From<Diagnostic> for Error {
    fn from(d: Diagnostic) -> Self {
        Error::Syntax {
            line: d.line,
            message: d.message,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParsedGraph {
    pub graph: Graph,
    pub diagnostics: Vec<Diagnostic>,
}

fn edge_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?P<from>\w+)[ \t]*(?P<conn>[-*>]{2})[ \t]*(?P<to>\w+)[ \t]*(?:#(?P<notes>.*))?$",
        )
        .unwrap()
    })
}

fn vertex_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#[ \t]*(?P<name>\w+)(?P<fields>(?:[ \t].*)?)$").unwrap())
}

fn field_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?P<key>\w+)[ \t]*:[ \t]*(?P<value>\([^)]*\)|[^ \t()]+)").unwrap()
    })
}

/// `key:value` pairs in `text`, plus whatever was left over between them.
fn split_fields(text: &str) -> (Vec<(&str, &str)>, String) {
    let mut fields = Vec::new();
    let mut rest = String::new();
    let mut last = 0;
    for caps in field_re().captures_iter(text) {
        let (Some(whole), Some(key), Some(value)) =
            (caps.get(0), caps.name("key"), caps.name("value"))
        else {
            continue;
        };
        rest.push_str(&text[last..whole.start()]);
        last = whole.end();
        fields.push((key.as_str(), value.as_str()));
    }
    rest.push_str(&text[last..]);
    (fields, rest.trim().to_string())
}

fn parse_float(value: &str) -> Option<f32> {
    value.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

fn parse_position(value: &str) -> Option<Position> {
    let inner = value.strip_prefix('(')?.strip_suffix(')')?;
    let (x, y) = inner.split_once(',')?;
    Some(Position::new(parse_float(x)?, parse_float(y)?))
}

struct Parser {
    graph: Graph,
    diagnostics: Vec<Diagnostic>,
    line: usize,
}

impl Parser {
    fn report(&mut self, message: String) {
        warn!(line = self.line, "{message}");
        self.diagnostics.push(Diagnostic {
            line: self.line,
            message,
        });
    }

    fn parse_line(&mut self, line: &str) -> Result<()> {
        if let Some(caps) = edge_line_re().captures(line) {
            let from = caps.name("from").map_or("", |m| m.as_str());
            let conn = caps.name("conn").map_or("", |m| m.as_str());
            let to = caps.name("to").map_or("", |m| m.as_str());
            let Some(kind) = EdgeKind::from_connector(conn) else {
                self.report(format!("unknown connector `{conn}` in `{line}`"));
                return Ok(());
            };

            self.graph.add_named_vertex(from);
            self.graph.add_named_vertex(to);
            self.graph.add_edge(from, to, kind)?;

            if let Some(notes) = caps.name("notes") {
                self.apply_edge_notes(from, to, kind, notes.as_str())?;
            }
            return Ok(());
        }

        if let Some(caps) = vertex_line_re().captures(line) {
            let name = caps.name("name").map_or("", |m| m.as_str());
            let fields = caps.name("fields").map_or("", |m| m.as_str());
            self.graph.add_named_vertex(name);
            return self.apply_vertex_fields(name, fields);
        }

        self.report(format!("syntax error in `{line}`"));
        Ok(())
    }

    fn apply_edge_notes(&mut self, from: &str, to: &str, kind: EdgeKind, notes: &str) -> Result<()> {
        let (fields, rest) = split_fields(notes);
        let mut angle = None;
        let mut strength = None;
        for (key, value) in fields {
            let slot = match key {
                "angle" => &mut angle,
                "strength" => &mut strength,
                other => {
                    self.report(format!("unknown edge annotation `{other}`"));
                    continue;
                }
            };
            match parse_float(value) {
                Some(v) => *slot = Some(v),
                None => self.report(format!("invalid {key} value `{value}`")),
            }
        }
        if !rest.is_empty() {
            self.report(format!("unrecognized edge annotation `{rest}`"));
        }
        if angle.is_some() || strength.is_some() {
            self.graph.annotate_edge(from, to, kind, angle, strength)?;
        }
        Ok(())
    }

    fn apply_vertex_fields(&mut self, name: &str, text: &str) -> Result<()> {
        let (fields, rest) = split_fields(text);
        for (key, value) in fields {
            match key {
                "pos" => match parse_position(value) {
                    Some(p) => self.graph.set_vertex_position(name, p)?,
                    None => self.report(format!("invalid position `{value}` for {name}")),
                },
                "type" => match VertexKind::from_keyword(value) {
                    Some(k) => self.graph.set_vertex_kind(name, k)?,
                    None => {
                        self.report(format!(
                            "unknown vertex type `{value}` for {name}, allowed: start|boss|save|poi"
                        ));
                        self.graph.set_vertex_kind(name, VertexKind::Normal)?;
                    }
                },
                "weight" => match parse_float(value) {
                    Some(w) => self.graph.set_vertex_weight(name, w)?,
                    None => self.report(format!("invalid weight `{value}` for {name}")),
                },
                other => self.report(format!("unknown vertex field `{other}` for {name}")),
            }
        }
        if !rest.is_empty() {
            self.report(format!("unrecognized vertex fields `{rest}` for {name}"));
        }
        Ok(())
    }
}

/// Lenient parse: malformed lines become diagnostics.
pub fn parse(source: &str) -> ParsedGraph {
    let mut parser = Parser {
        graph: Graph::new(),
        diagnostics: Vec::new(),
        line: 0,
    };
    for (i, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        parser.line = i + 1;
        if let Err(err) = parser.parse_line(line) {
            parser.report(err.to_string());
        }
    }
    parser.graph.set_dirty(false);
    ParsedGraph {
        graph: parser.graph,
        diagnostics: parser.diagnostics,
    }
}

pub fn parse_with_options(source: &str, options: ParseOptions) -> Result<ParsedGraph> {
    let parsed = parse(source);
    if options.strict {
        if let Some(first) = parsed.diagnostics.first() {
            return Err(first.clone().into());
        }
    }
    Ok(parsed)
}

impl fmt::Display for Graph {
    /// Edge lines, a blank line, then one vertex line per vertex.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for edge in self.edges() {
            f.write_str(&self.edge_name(edge))?;
            let mut notes = Vec::new();
            if let Some(angle) = edge.angle() {
                notes.push(format!("angle:{angle}"));
            }
            if let Some(strength) = edge.strength() {
                notes.push(format!("strength:{strength}"));
            }
            if !notes.is_empty() {
                write!(f, " # {}", notes.join(" "))?;
            }
            f.write_str("\n")?;
        }
        f.write_str("\n")?;
        for v in self.vertices() {
            let p = v.position();
            writeln!(
                f,
                "#{} pos:({},{}) type:{} weight:{}",
                v.name(),
                p.x,
                p.y,
                v.kind().keyword(),
                v.weight()
            )?;
        }
        Ok(())
    }
}

impl FromStr for Graph {
    type Err = Error;

    /// Strict parse; see [`parse`] for the lenient form.
    fn from_str(s: &str) -> Result<Self> {
        parse_with_options(s, ParseOptions::strict()).map(|p| p.graph)
    }
}
