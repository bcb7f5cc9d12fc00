// src/tree/tokenize.rs

//! Split a shell-like command string into argv tokens.

/// Tokenize `command` the way a (very small) shell would.
///
/// - Unquoted whitespace separates tokens; runs of whitespace never produce
///   empty tokens.
/// - `"` toggles quoting. Whitespace inside quotes is literal and the quote
///   characters themselves are dropped.
/// - Outside quotes, `\` followed by a space or `"` escapes that character.
///   Any other backslash is kept as-is, so Windows-style paths survive.
///
/// Unterminated quotes are not an error; the rest of the input is simply
/// taken literally.
pub fn tokenize(command: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut token = String::new();

    let mut in_quotes = false;
    let mut escape_next = false;

    let mut chars = command.chars().peekable();
    while let Some(c) = chars.next() {
        if escape_next {
            token.push(c);
            escape_next = false;
            continue;
        }

        if c == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if in_quotes {
            token.push(c);
            continue;
        }

        if c == '\\' && matches!(chars.peek(), Some(' ') | Some('"')) {
            escape_next = true;
            continue;
        }

        if c.is_whitespace() {
            if !token.is_empty() {
                tokens.push(std::mem::take(&mut token));
            }
            continue;
        }

        token.push(c);
    }

    if !token.is_empty() {
        tokens.push(token);
    }

    tokens
}
