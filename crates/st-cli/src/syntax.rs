//! Roll syntax recognition.
//!
//! Pool rolls look like `<pool>[ |@]<difficulty> <±autos> <specialty>`, where
//! every part after the pool is optional: `5`, `5 6`, `5@6`, `5 6 +1`,
//! `5 -1`, `5 6 Brawl`. Anything else is tried as a traditional expression.
//! A `#` starts a comment that is shown with the result.

use st_mechanics::DiceExpression;

/// A pool roll as typed, before settings are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSyntax {
    pub pool: i32,
    pub difficulty: Option<i32>,
    pub auto_successes: i32,
    pub specialty: Option<String>,
}

/// What a line of roll syntax asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Syntax {
    Pool(PoolSyntax),
    Traditional(DiceExpression),
}

/// Split `syntax # comment` into its parts.
pub fn split_comment(input: &str) -> (&str, Option<&str>) {
    match input.split_once('#') {
        Some((syntax, comment)) => {
            let comment = comment.trim();
            (syntax.trim(), (!comment.is_empty()).then_some(comment))
        }
        None => (input.trim(), None),
    }
}

/// Decide whether `input` is a pool or traditional roll.
pub fn classify(input: &str) -> Result<Syntax, String> {
    let input = input.trim();
    if let Some(pool) = parse_pool(input) {
        tracing::debug!(?pool, "pool syntax");
        return Ok(Syntax::Pool(pool));
    }
    if input.contains(['d', 'D']) {
        let expression = DiceExpression::parse(input).map_err(|e| e.to_string())?;
        tracing::debug!(%expression, "traditional syntax");
        return Ok(Syntax::Traditional(expression));
    }
    Err(format!(
        "`{input}` is not a roll; try `5 6` for a pool or `2d6+3` for dice"
    ))
}

/// Parse pool syntax, or `None` if `input` is not one.
pub fn parse_pool(input: &str) -> Option<PoolSyntax> {
    let (head, specialty) = split_specialty(input);
    let mut rest = head;

    let pool = take_number(&mut rest, &['-'])?;

    let mut difficulty = None;
    if let Some(after) = rest
        .strip_prefix([' ', '@'])
        .filter(|after| after.starts_with(|c: char| c.is_ascii_digit()))
    {
        rest = after;
        difficulty = Some(take_number(&mut rest, &[])?);
    }

    rest = rest.strip_prefix(' ').unwrap_or(rest);
    let auto_successes = if rest.is_empty() {
        0
    } else {
        take_number(&mut rest, &['+', '-'])?
    };

    rest.is_empty().then(|| PoolSyntax {
        pool,
        difficulty,
        auto_successes,
        specialty: specialty.map(str::to_string),
    })
}

/// Split off a trailing specialty: the text after the first space that is
/// not followed by a number.
fn split_specialty(input: &str) -> (&str, Option<&str>) {
    for (i, _) in input.match_indices(' ') {
        let tail = &input[i + 1..];
        let unsigned = tail.strip_prefix(['+', '-']).unwrap_or(tail);
        if tail.is_empty() || unsigned.starts_with(|c: char| c.is_ascii_digit()) {
            continue;
        }
        let specialty = tail.trim();
        return (&input[..i], (!specialty.is_empty()).then_some(specialty));
    }
    (input, None)
}

/// Consume an integer with an optional sign from `signs`.
fn take_number(rest: &mut &str, signs: &[char]) -> Option<i32> {
    let start = *rest;
    let unsigned = start.strip_prefix(signs).unwrap_or(start);
    let sign_len = start.len() - unsigned.len();
    let digits = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if digits == 0 {
        return None;
    }
    let (number, tail) = start.split_at(sign_len + digits);
    *rest = tail;
    number.parse().ok()
}
