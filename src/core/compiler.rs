//! Layout compilation and rendering
//!
//! A layout is compiled once per level into an ordered instruction list.
//! Tokens with a literal source are styled and baked into the list at compile
//! time; built-in and function-backed tokens become placeholders resolved on
//! every call. Rendering walks the list in order, dropping empty placeholders
//! together with their padding and collapsing the space runs that leaves
//! behind in the surrounding literal text.

use super::date_format::{format_date, style_date_tokens};
use super::layout::{parse_layout_with, TokenKind, UnterminatedBrace};
use super::log_level::LogLevel;
use super::log_value::LogValue;
use super::style::{default_styler, StyleSpec, Styler};
use super::token::{is_builtin, TokenSource, BUILTIN_TOKENS, CALLER_TOKENS};
use chrono::{DateTime, TimeZone};
use std::collections::HashMap;
use std::sync::Arc;

/// Everything a custom render function gets to work with
pub struct RenderContext<'a> {
    pub level: LogLevel,
    /// Every resolved token value, built-ins included
    pub values: &'a HashMap<String, String>,
    /// Raw arguments of the call, message template first
    pub args: &'a [LogValue],
    /// Composed stylers keyed by token name
    pub stylers: &'a HashMap<String, Styler>,
}

impl RenderContext<'_> {
    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    /// Style `text` the way token `name` would be styled; unstyled when it has no style
    pub fn style(&self, name: &str, text: &str) -> String {
        match self.stylers.get(name) {
            Some(styler) => styler(text),
            None => text.to_string(),
        }
    }
}

/// Replaces the compiled layout of a level
pub type RenderFn = Arc<dyn Fn(&RenderContext<'_>) -> String + Send + Sync>;

/// A token resolved at render time
#[derive(Clone)]
pub struct Placeholder {
    pub name: String,
    pub styler: Option<Styler>,
    pub pad_left: String,
    pub pad_right: String,
}

#[derive(Clone)]
pub enum Instruction {
    /// Layout text; runs of spaces collapse
    Text(String),
    /// Pre-rendered value or verbatim unknown token; emitted as is
    Static(String),
    Placeholder(Placeholder),
    /// Date marker with its styling already wrapped around it
    Date { pattern: String },
}

/// Inputs for compiling one level's layout
pub struct CompileInput<'a> {
    pub level: LogLevel,
    pub styles: &'a HashMap<String, StyleSpec>,
    pub tokens: &'a HashMap<String, TokenSource>,
    pub policy: UnterminatedBrace,
}

/// Render plan for one level
#[derive(Clone)]
pub struct CompiledLayout {
    instructions: Vec<Instruction>,
    stylers: HashMap<String, Styler>,
    uses_caller_info: bool,
}

/// Compile `layout` into a render plan
pub fn compile_layout(layout: &str, input: &CompileInput<'_>) -> CompiledLayout {
    let stylers = compose_stylers(input);
    let mut plan = PlanBuilder::default();
    let mut uses_caller_info = false;
    let mut cursor = 0;

    for token in parse_layout_with(layout, input.policy) {
        plan.text(&layout[cursor..token.start]);
        cursor = token.end;

        if token.kind == TokenKind::Date {
            let pattern = match stylers.get("date") {
                Some(styler) => style_date_tokens(&token.raw, |raw| styler(raw)),
                None => token.raw.clone(),
            };
            plan.push(Instruction::Date { pattern });
            continue;
        }

        let name = token.name.as_str();
        let styler = stylers.get(name).cloned();
        match input.tokens.get(name) {
            Some(TokenSource::Literal(value)) => {
                if !value.is_empty() {
                    let padded = format!("{}{}{}", token.pad_left, value, token.pad_right);
                    plan.push(Instruction::Static(apply(styler.as_ref(), &padded)));
                }
            }
            // function tokens and built-ins resolve per call
            source if source.is_some() || is_builtin(name) => {
                uses_caller_info |= CALLER_TOKENS.contains(&name);
                plan.push(Instruction::Placeholder(Placeholder {
                    name: token.name.clone(),
                    styler,
                    pad_left: token.pad_left.clone(),
                    pad_right: token.pad_right.clone(),
                }));
            }
            _ => plan.push(Instruction::Static(token.raw.clone())),
        }
    }
    plan.text(&layout[cursor..]);

    CompiledLayout {
        instructions: plan.finish(),
        stylers,
        uses_caller_info,
    }
}

/// Level styles win over the built-in defaults
fn compose_stylers(input: &CompileInput<'_>) -> HashMap<String, Styler> {
    let mut stylers: HashMap<String, Styler> = BUILTIN_TOKENS
        .iter()
        .filter_map(|name| default_styler(name, input.level).map(|s| (name.to_string(), s)))
        .collect();
    for (name, spec) in input.styles {
        stylers.insert(name.clone(), spec.resolve());
    }
    stylers
}

fn apply(styler: Option<&Styler>, text: &str) -> String {
    match styler {
        Some(styler) => styler(text),
        None => text.to_string(),
    }
}

/// Merges adjacent layout text so empty static tokens leave a single run
#[derive(Default)]
struct PlanBuilder {
    instructions: Vec<Instruction>,
}

impl PlanBuilder {
    fn text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Instruction::Text(last)) = self.instructions.last_mut() {
            last.push_str(text);
        } else {
            self.instructions.push(Instruction::Text(text.to_string()));
        }
    }

    fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    fn finish(self) -> Vec<Instruction> {
        self.instructions
    }
}

impl CompiledLayout {
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Composed stylers, handed to custom render functions
    pub fn stylers(&self) -> &HashMap<String, Styler> {
        &self.stylers
    }

    /// Whether rendering needs `file`, `line` or `column`
    pub fn uses_caller_info(&self) -> bool {
        self.uses_caller_info
    }

    /// Names of the placeholders this plan resolves per call
    pub fn placeholder_names(&self) -> impl Iterator<Item = &str> {
        self.instructions.iter().filter_map(|ins| match ins {
            Instruction::Placeholder(p) => Some(p.name.as_str()),
            _ => None,
        })
    }

    /// Render with resolved token `values`; date markers use `date`
    pub fn render<Tz: TimeZone>(
        &self,
        values: &HashMap<String, String>,
        date: &DateTime<Tz>,
    ) -> String {
        let mut out = String::with_capacity(128);
        let mut pending = String::new();

        for instruction in &self.instructions {
            match instruction {
                Instruction::Text(text) => pending.push_str(text),
                Instruction::Static(value) => {
                    flush_text(&mut out, &mut pending);
                    out.push_str(value);
                }
                Instruction::Date { pattern } => {
                    flush_text(&mut out, &mut pending);
                    out.push_str(&format_date(pattern, date));
                }
                Instruction::Placeholder(p) => {
                    let value = values.get(&p.name).map(String::as_str).unwrap_or("");
                    if value.is_empty() {
                        continue;
                    }
                    flush_text(&mut out, &mut pending);
                    let padded = format!("{}{}{}", p.pad_left, value, p.pad_right);
                    out.push_str(&apply(p.styler.as_ref(), &padded));
                }
            }
        }
        flush_text(&mut out, &mut pending);

        out
    }
}

fn flush_text(out: &mut String, pending: &mut String) {
    if pending.is_empty() {
        return;
    }
    let mut previous_space = false;
    for c in pending.chars() {
        if c == ' ' {
            if previous_space {
                continue;
            }
            previous_space = true;
        } else {
            previous_space = false;
        }
        out.push(c);
    }
    pending.clear();
}
