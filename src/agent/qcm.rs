//! Reading back the answer the model designated in a generated QCM.

const ANSWER_MARKERS: [&str; 2] = ["réponse", "reponse"];

fn is_decoration(c: char) -> bool {
    c.is_whitespace() || matches!(c, '*' | '_' | '(' | '[')
}

/// Letter (`A` to `D`) stated after the last `Réponse :` marker of a QCM.
///
/// Matching ignores case, accepts the unaccented spelling and skips markdown emphasis
/// around the letter, so `**Réponse :** b)` yields `B`. Returns `None` when no marker is
/// followed by one of the four option letters.
pub fn parse_qcm_answer(text: &str) -> Option<char> {
    let lower = text.to_lowercase();

    let after_marker = ANSWER_MARKERS
        .iter()
        .filter_map(|marker| lower.rfind(marker).map(|pos| pos + marker.len()))
        .max()?;

    let rest = lower[after_marker..].trim_start_matches(is_decoration);
    let rest = rest.strip_prefix(':')?;
    let letter = rest.trim_start_matches(is_decoration).chars().next()?;

    matches!(letter, 'a'..='d').then(|| letter.to_ascii_uppercase())
}
