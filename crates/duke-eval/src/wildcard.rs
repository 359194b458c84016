//! Wildcard text patterns
//!
//! `*` matches any run of characters, `?` exactly one, and `~` escapes the
//! next `*`, `?` or `~`. Matching ignores case.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    AnyRun,
    AnyOne,
    Literal(char),
}

/// A compiled wildcard pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardPattern {
    tokens: Vec<Token>,
}

impl WildcardPattern {
    /// Compile `text`, or `None` when it holds no wildcard syntax at all
    pub fn parse(text: &str) -> Option<Self> {
        let mut tokens = Vec::with_capacity(text.len());
        let mut has_wildcard = false;
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '*' => {
                    has_wildcard = true;
                    tokens.push(Token::AnyRun);
                }
                '?' => {
                    has_wildcard = true;
                    tokens.push(Token::AnyOne);
                }
                '~' => match chars.peek() {
                    Some(&next @ ('*' | '?' | '~')) => {
                        has_wildcard = true;
                        chars.next();
                        tokens.push(Token::Literal(fold(next)));
                    }
                    _ => tokens.push(Token::Literal('~')),
                },
                _ => tokens.push(Token::Literal(fold(c))),
            }
        }

        has_wildcard.then_some(Self { tokens })
    }

    /// Whether the whole of `text` matches
    pub fn matches(&self, text: &str) -> bool {
        let text: Vec<char> = text.chars().map(fold).collect();
        let pattern = &self.tokens;

        let mut pi = 0;
        let mut ti = 0;
        let mut star_pi = None;
        let mut star_ti = 0;

        while ti < text.len() {
            match pattern.get(pi) {
                Some(Token::AnyOne) => {
                    pi += 1;
                    ti += 1;
                }
                Some(Token::Literal(c)) if *c == text[ti] => {
                    pi += 1;
                    ti += 1;
                }
                Some(Token::AnyRun) => {
                    star_pi = Some(pi);
                    star_ti = ti;
                    pi += 1;
                }
                _ => match star_pi {
                    Some(sp) => {
                        pi = sp + 1;
                        star_ti += 1;
                        ti = star_ti;
                    }
                    None => return false,
                },
            }
        }

        while pattern.get(pi) == Some(&Token::AnyRun) {
            pi += 1;
        }
        pi == pattern.len()
    }
}

/// Case folding used for comparisons
fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}
