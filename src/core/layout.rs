//! Layout parsing
//!
//! A layout is literal text mixed with tokens:
//!
//! - `{name}` names a field; spaces inside the braces (`{ level }`) are kept
//!   as padding around the rendered value,
//! - `%d` / `%d{spec}` is a date marker,
//! - `%x` / `%x{spec}` for any other ASCII letter addresses a field the same way.
//!
//! Parsing is a single left-to-right pass and yields token descriptors in
//! source order; everything between tokens is literal text.

/// Which family a token belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Date,
    Field,
}

/// A token found in a layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDescriptor {
    pub kind: TokenKind,
    /// Exact source text of the token
    pub raw: String,
    /// Field name, date spec, or the bare marker itself
    pub name: String,
    /// Byte offset of the first token byte
    pub start: usize,
    /// Byte offset one past the last token byte
    pub end: usize,
    pub pad_left: String,
    pub pad_right: String,
}

/// What to do with a `{` that is not closed before the next `{`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnterminatedBrace {
    /// Stop recognizing tokens; the rest of the layout is literal
    #[default]
    Halt,
    /// Treat the stray brace as literal and keep scanning
    Resume,
}

/// Parse `layout` with the default [`UnterminatedBrace::Halt`] policy
pub fn parse_layout(layout: &str) -> Vec<TokenDescriptor> {
    parse_layout_with(layout, UnterminatedBrace::Halt)
}

pub fn parse_layout_with(layout: &str, policy: UnterminatedBrace) -> Vec<TokenDescriptor> {
    let bytes = layout.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' if bytes.get(i + 1).is_some_and(u8::is_ascii_alphabetic) => {
                let kind = if bytes[i + 1] == b'd' {
                    TokenKind::Date
                } else {
                    TokenKind::Field
                };

                if bytes.get(i + 2) != Some(&b'{') {
                    let raw = &layout[i..i + 2];
                    tokens.push(TokenDescriptor {
                        kind,
                        raw: raw.to_string(),
                        name: raw.to_string(),
                        start: i,
                        end: i + 2,
                        pad_left: String::new(),
                        pad_right: String::new(),
                    });
                    i += 2;
                    continue;
                }

                match find_close(bytes, i + 3) {
                    Some(close) => {
                        tokens.push(TokenDescriptor {
                            kind,
                            raw: layout[i..=close].to_string(),
                            name: layout[i + 3..close].to_string(),
                            start: i,
                            end: close + 1,
                            pad_left: String::new(),
                            pad_right: String::new(),
                        });
                        i = close + 1;
                    }
                    None => match policy {
                        UnterminatedBrace::Halt => break,
                        UnterminatedBrace::Resume => i += 3,
                    },
                }
            }
            b'{' => match find_close(bytes, i + 1) {
                Some(close) => {
                    let inner = &layout[i + 1..close];
                    let name = inner.trim();
                    if !name.is_empty() {
                        let lead = inner.len() - inner.trim_start().len();
                        let trail = inner.len() - inner.trim_end().len();
                        tokens.push(TokenDescriptor {
                            kind: TokenKind::Field,
                            raw: layout[i..=close].to_string(),
                            name: name.to_string(),
                            start: i,
                            end: close + 1,
                            pad_left: inner[..lead].to_string(),
                            pad_right: inner[inner.len() - trail..].to_string(),
                        });
                    }
                    i = close + 1;
                }
                None => match policy {
                    UnterminatedBrace::Halt => break,
                    UnterminatedBrace::Resume => i += 1,
                },
            },
            _ => i += 1,
        }
    }

    tokens
}

/// Index of the `}` closing a brace opened before `from`, unless another `{` comes first
fn find_close(bytes: &[u8], from: usize) -> Option<usize> {
    for (offset, byte) in bytes.get(from..)?.iter().enumerate() {
        match byte {
            b'}' => return Some(from + offset),
            b'{' => return None,
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tokens: &[TokenDescriptor]) -> Vec<&str> {
        tokens.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_field_tokens_in_order() {
        let tokens = parse_layout("{name} [{level}] {msg}");
        assert_eq!(names(&tokens), vec!["name", "level", "msg"]);
        assert_eq!(tokens[1].start, 8);
        assert_eq!(tokens[1].end, 15);
        assert_eq!(tokens[1].raw, "{level}");
        assert!(tokens.windows(2).all(|w| w[0].end <= w[1].start));
    }

    #[test]
    fn test_padding_is_captured() {
        let tokens = parse_layout("{  label } {msg}");
        assert_eq!(tokens[0].name, "label");
        assert_eq!(tokens[0].pad_left, "  ");
        assert_eq!(tokens[0].pad_right, " ");
        assert_eq!(tokens[1].pad_left, "");
    }

    #[test]
    fn test_empty_braces_are_literal() {
        let tokens = parse_layout("{ } {msg}");
        assert_eq!(names(&tokens), vec!["msg"]);
    }

    #[test]
    fn test_date_markers() {
        let tokens = parse_layout("%d %d{HH:mm:ss} {msg}");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].kind, TokenKind::Date);
        assert_eq!(tokens[0].name, "%d");
        assert_eq!(tokens[1].kind, TokenKind::Date);
        assert_eq!(tokens[1].name, "HH:mm:ss");
        assert_eq!(tokens[1].raw, "%d{HH:mm:ss}");
        assert_eq!(tokens[2].kind, TokenKind::Field);
    }

    #[test]
    fn test_percent_letter_fields() {
        let tokens = parse_layout("%n{name} %m 100% %1");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Field);
        assert_eq!(tokens[0].name, "name");
        assert_eq!(tokens[1].name, "%m");
    }

    #[test]
    fn test_unterminated_brace_halts() {
        let tokens = parse_layout("{name} {oops {msg} %d");
        assert_eq!(names(&tokens), vec!["name"]);
    }

    #[test]
    fn test_unterminated_brace_resumes() {
        let tokens = parse_layout_with("{name} {oops {msg} %d", UnterminatedBrace::Resume);
        assert_eq!(names(&tokens), vec!["name", "msg", "%d"]);
        assert_eq!(tokens[1].start, 13);
    }

    #[test]
    fn test_unterminated_date_spec() {
        assert!(parse_layout("%d{HH:mm {msg}").is_empty());

        let tokens = parse_layout_with("%d{HH:mm {msg}", UnterminatedBrace::Resume);
        assert_eq!(names(&tokens), vec!["msg"]);
    }

    #[test]
    fn test_multibyte_literals() {
        let tokens = parse_layout("→ {name} · {msg}");
        assert_eq!(names(&tokens), vec!["name", "msg"]);
        assert_eq!(&"→ {name} · {msg}"[tokens[1].start..tokens[1].end], "{msg}");
    }
}
