use crate::error::ParseError;

/// Parse `git blame` output into one owning commit id per source line.
///
/// Each line is `<id> (<attribution>) <content>`. History-boundary lines
/// carry a `^` prefix that displaces the last hex digit of the id, so a
/// returned id may be one character short; callers resolve by prefix.
/// The line count must match the requested range exactly.
pub fn parse(raw: &str, path: &str, want: u32) -> Result<Vec<String>, ParseError> {
    let mut ids = Vec::with_capacity(want as usize);
    for line in raw.lines() {
        let token = line
            .split_whitespace()
            .next()
            .ok_or_else(|| ParseError::BlameLine(line.to_string()))?;
        let id = token.strip_prefix('^').unwrap_or(token);
        let hex = !id.is_empty() && id.bytes().all(|b| b.is_ascii_hexdigit());
        if !hex || !line.contains('(') {
            return Err(ParseError::BlameLine(line.to_string()));
        }
        ids.push(id.to_string());
    }
    if ids.len() as u32 != want {
        return Err(ParseError::BlameCount {
            path: path.to_string(),
            want,
            got: ids.len() as u32,
        });
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const ID_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    #[test]
    fn parses_attributed_lines() {
        let raw = format!(
            "{ID_A} (Alice 2024-01-02 12:00:00 +0000 1) fn a() {{}}\n\
             {ID_B} (Bob   2024-02-03 09:30:00 +0000 2) fn b() {{}}\n"
        );
        let ids = parse(&raw, "src/lib.rs", 2).unwrap();
        assert_eq!(ids, vec![ID_A.to_string(), ID_B.to_string()]);
    }

    #[test]
    fn strips_boundary_marker() {
        let boundary = &ID_A[..39];
        let raw = format!("^{boundary} (Alice 2024-01-02 12:00:00 +0000 1) fn a() {{}}\n");
        let ids = parse(&raw, "src/lib.rs", 1).unwrap();
        assert_eq!(ids, vec![boundary.to_string()]);
    }

    #[test]
    fn handles_renamed_origin_path() {
        // with renames, blame injects the original path before the parens
        let raw = format!("{ID_A} old/name.rs (Alice 2024-01-02 12:00:00 +0000 1) x\n");
        let ids = parse(&raw, "new/name.rs", 1).unwrap();
        assert_eq!(ids, vec![ID_A.to_string()]);
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(parse("not-hex (Alice 1) x\n", "f", 1).is_err());
        assert!(parse(&format!("{ID_A} no attribution\n"), "f", 1).is_err());
    }

    #[test]
    fn rejects_count_mismatch() {
        let raw = format!("{ID_A} (Alice 2024-01-02 12:00:00 +0000 1) x\n");
        let err = parse(&raw, "f", 2).unwrap_err();
        assert!(matches!(err, ParseError::BlameCount { want: 2, got: 1, .. }));
    }
}
