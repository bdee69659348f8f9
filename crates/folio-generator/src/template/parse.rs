//! Directive scanner.
//!
//! Template text is split into tags (`{{ ... }}`) and literal runs, then
//! folded into a tree by a recursive-descent pass. Each block keyword tracks
//! its own nesting, so an `{{#each}}` inside another `{{#each}}` pairs with
//! the right `{{/each}}`.
//!
//! Malformed input never fails: an unterminated `{{` and everything after it
//! is literal text, stray `{{else}}`/`{{/...}}` tags are literal, and a block
//! that is never closed renders its opening tag literally followed by its
//! body.

/// Parsed template node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal text, emitted as is.
    Text(String),
    /// `{{path}}`
    Var(String),
    /// `{{#each path}} body {{/each}}`
    Each { path: String, body: Vec<Node> },
    /// `{{#if condition}} then {{else}} otherwise {{/if}}`
    If {
        condition: String,
        then_branch: Vec<Node>,
        else_branch: Vec<Node>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag<'t> {
    Each(&'t str),
    If(&'t str),
    Else,
    EndEach,
    EndIf,
    Var(&'t str),
}

#[derive(Debug, Clone, Copy)]
enum Token<'t> {
    Text(&'t str),
    Tag { raw: &'t str, tag: Tag<'t> },
}

/// Parse template text into a node tree.
pub fn parse(source: &str) -> Vec<Node> {
    let mut parser = Parser {
        tokens: tokenize(source),
        pos: 0,
    };
    let (nodes, _) = parser.parse_until(&[]);
    nodes
}

fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = source;

    while !rest.is_empty() {
        let Some(open) = rest.find("{{") else {
            tokens.push(Token::Text(rest));
            break;
        };
        if open > 0 {
            tokens.push(Token::Text(&rest[..open]));
        }

        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("}}") else {
            tokens.push(Token::Text(&rest[open..]));
            break;
        };

        let end = open + 2 + close + 2;
        let raw = &rest[open..end];
        match classify(after_open[..close].trim()) {
            Some(tag) => tokens.push(Token::Tag { raw, tag }),
            None => tokens.push(Token::Text(raw)),
        }
        rest = &rest[end..];
    }

    tokens
}

fn classify(inner: &str) -> Option<Tag<'_>> {
    if inner.is_empty() {
        return None;
    }
    if inner == "else" {
        return Some(Tag::Else);
    }
    if let Some(block) = inner.strip_prefix('#') {
        let (keyword, argument) = block
            .split_once(char::is_whitespace)
            .unwrap_or((block, ""));
        return match keyword {
            "each" => Some(Tag::Each(argument.trim())),
            "if" => Some(Tag::If(argument.trim())),
            _ => None,
        };
    }
    if let Some(block) = inner.strip_prefix('/') {
        return match block.trim() {
            "each" => Some(Tag::EndEach),
            "if" => Some(Tag::EndIf),
            _ => None,
        };
    }
    Some(Tag::Var(inner))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Closer {
    Else,
    EndEach,
    EndIf,
}

struct Parser<'t> {
    tokens: Vec<Token<'t>>,
    pos: usize,
}

impl<'t> Parser<'t> {
    fn next(&mut self) -> Option<Token<'t>> {
        let token = self.tokens.get(self.pos).copied();
        self.pos += 1;
        token
    }

    /// Collect nodes until one of `accept` closes the current block.
    ///
    /// Returns the closer that stopped the scan with its raw text, or `None`
    /// at end of input.
    fn parse_until(&mut self, accept: &[Closer]) -> (Vec<Node>, Option<(Closer, &'t str)>) {
        let mut nodes = Vec::new();

        while let Some(token) = self.next() {
            let (raw, tag) = match token {
                Token::Text(text) => {
                    push_text(&mut nodes, text);
                    continue;
                }
                Token::Tag { raw, tag } => (raw, tag),
            };

            let closer = match tag {
                Tag::Var(path) => {
                    nodes.push(Node::Var(path.to_string()));
                    continue;
                }
                Tag::Each(path) => {
                    self.parse_each(raw, path, &mut nodes);
                    continue;
                }
                Tag::If(condition) => {
                    self.parse_if(raw, condition, &mut nodes);
                    continue;
                }
                Tag::Else => Closer::Else,
                Tag::EndEach => Closer::EndEach,
                Tag::EndIf => Closer::EndIf,
            };

            if accept.contains(&closer) {
                return (nodes, Some((closer, raw)));
            }
            push_text(&mut nodes, raw);
        }

        (nodes, None)
    }

    fn parse_each(&mut self, raw: &str, path: &str, nodes: &mut Vec<Node>) {
        let (body, closer) = self.parse_until(&[Closer::EndEach]);
        if closer.is_some() {
            nodes.push(Node::Each {
                path: path.to_string(),
                body,
            });
        } else {
            push_text(nodes, raw);
            extend_nodes(nodes, body);
        }
    }

    fn parse_if(&mut self, raw: &str, condition: &str, nodes: &mut Vec<Node>) {
        let (then_branch, closer) = self.parse_until(&[Closer::Else, Closer::EndIf]);
        match closer {
            Some((Closer::EndIf, _)) => nodes.push(Node::If {
                condition: condition.to_string(),
                then_branch,
                else_branch: Vec::new(),
            }),
            Some((_, else_raw)) => {
                let (else_branch, closer) = self.parse_until(&[Closer::EndIf]);
                if closer.is_some() {
                    nodes.push(Node::If {
                        condition: condition.to_string(),
                        then_branch,
                        else_branch,
                    });
                } else {
                    push_text(nodes, raw);
                    extend_nodes(nodes, then_branch);
                    push_text(nodes, else_raw);
                    extend_nodes(nodes, else_branch);
                }
            }
            None => {
                push_text(nodes, raw);
                extend_nodes(nodes, then_branch);
            }
        }
    }
}

fn push_text(nodes: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Text(last)) = nodes.last_mut() {
        last.push_str(text);
    } else {
        nodes.push(Node::Text(text.to_string()));
    }
}

fn extend_nodes(nodes: &mut Vec<Node>, more: Vec<Node>) {
    for node in more {
        match node {
            Node::Text(text) => push_text(nodes, &text),
            other => nodes.push(other),
        }
    }
}
