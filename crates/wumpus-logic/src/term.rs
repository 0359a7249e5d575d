//! Predicate argument terms.
//!
//! Arguments are kept as strings. A token is a variable when it is an identifier starting
//! with a lowercase ASCII letter (`x`, `y`, `cell_1`); integers and every other token are
//! constants. Arguments may combine integers and variables with `+`/`-` (`x+1`, `y-1`),
//! which is folded to a single integer once every variable in it is bound.

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Num(i64),
    Text(String),
    Op(char),
}

impl Piece {
    fn render(&self, out: &mut String) {
        match self {
            Piece::Num(n) => out.push_str(&n.to_string()),
            Piece::Text(s) => out.push_str(s),
            Piece::Op(c) => out.push(*c),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn tokenize(arg: &str) -> Vec<Piece> {
    let mut out = Vec::new();
    let mut chars = arg.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        if c.is_whitespace() {
            continue;
        }
        if c == '+' || c == '-' {
            out.push(Piece::Op(c));
            continue;
        }

        let mut end = start + c.len_utf8();
        let run: fn(char) -> bool = if c.is_ascii_digit() {
            |c| c.is_ascii_digit()
        } else if is_ident_start(c) {
            is_ident_continue
        } else {
            |_| false
        };
        while let Some(&(idx, next)) = chars.peek() {
            if !run(next) {
                break;
            }
            end = idx + next.len_utf8();
            chars.next();
        }

        let text = &arg[start..end];
        match text.parse::<i64>() {
            Ok(n) if c.is_ascii_digit() => out.push(Piece::Num(n)),
            _ => out.push(Piece::Text(text.to_string())),
        }
    }
    out
}

/// Whether `token` names a variable.
pub fn is_variable(token: &str) -> bool {
    let mut chars = token.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase()) && chars.all(is_ident_continue)
}

/// Variables mentioned by an argument, in order of appearance.
pub fn variables(arg: &str) -> Vec<String> {
    tokenize(arg)
        .into_iter()
        .filter_map(|piece| match piece {
            Piece::Text(s) if is_variable(&s) => Some(s),
            _ => None,
        })
        .collect()
}

/// An argument is ground when it mentions no variable.
pub fn is_ground(arg: &str) -> bool {
    variables(arg).is_empty()
}

/// Replace bound variables in `arg` and fold integer arithmetic where possible.
///
/// Unbound variables stay in place, so `x+1` with only `y` bound is returned unchanged.
pub fn substitute<'a, F>(arg: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<&'a str>,
{
    let pieces: Vec<Piece> = tokenize(arg)
        .into_iter()
        .map(|piece| match piece {
            Piece::Text(name) if is_variable(&name) => match lookup(name.as_str()) {
                Some(value) => match value.trim().parse::<i64>() {
                    Ok(n) => Piece::Num(n),
                    Err(_) => Piece::Text(value.to_string()),
                },
                None => Piece::Text(name),
            },
            other => other,
        })
        .collect();

    if pieces.iter().any(|p| matches!(p, Piece::Op(_))) {
        if let Some(n) = evaluate(&pieces) {
            return n.to_string();
        }
    }

    let mut out = String::with_capacity(arg.len());
    for piece in &pieces {
        piece.render(&mut out);
    }
    out
}

fn evaluate(pieces: &[Piece]) -> Option<i64> {
    let mut iter = pieces.iter();
    let mut total = operand(&mut iter)?;
    while let Some(piece) = iter.next() {
        let rhs = operand(&mut iter)?;
        total = match piece {
            Piece::Op('+') => total.checked_add(rhs)?,
            Piece::Op('-') => total.checked_sub(rhs)?,
            _ => return None,
        };
    }
    Some(total)
}

fn operand<'a>(iter: &mut impl Iterator<Item = &'a Piece>) -> Option<i64> {
    match iter.next()? {
        Piece::Num(n) => Some(*n),
        Piece::Op('-') => operand(iter).and_then(i64::checked_neg),
        Piece::Op('+') => operand(iter),
        _ => None,
    }
}
