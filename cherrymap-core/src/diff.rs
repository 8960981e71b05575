use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::hunk::HunkHeader;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineOrigin {
    Context,
    Addition,
    Deletion,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffLine {
    pub origin: LineOrigin,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hunk {
    pub header: HunkHeader,
    pub lines: Vec<DiffLine>,
}

/// One file's worth of a unified diff.
///
/// A `/dev/null` pre-image (file creation) leaves `old_path` empty; a
/// `/dev/null` post-image (deletion) leaves `new_path` empty. A rename
/// carries both paths, differing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilePatch {
    pub old_path: Option<String>,
    pub new_path: Option<String>,
    pub binary: bool,
    pub hunks: Vec<Hunk>,
}

impl FilePatch {
    fn empty() -> Self {
        FilePatch {
            old_path: None,
            new_path: None,
            binary: false,
            hunks: Vec::new(),
        }
    }

    pub fn is_created(&self) -> bool {
        self.old_path.is_none()
    }

    pub fn is_deleted(&self) -> bool {
        self.new_path.is_none()
    }

    pub fn is_renamed(&self) -> bool {
        match (&self.old_path, &self.new_path) {
            (Some(old), Some(new)) => old != new,
            _ => false,
        }
    }
}

/// Parse a complete `git diff` stream into per-file patches.
///
/// Hunk bodies are consumed strictly by the counts their header promised;
/// any body line that fits neither side, and any truncation, is fatal.
pub fn parse(text: &str) -> Result<Vec<FilePatch>, ParseError> {
    let mut patches: Vec<FilePatch> = Vec::new();
    let mut old_left = 0u32;
    let mut new_left = 0u32;

    for line in text.lines() {
        // Inside a hunk body: exactly as many lines as the header promised.
        if old_left > 0 || new_left > 0 {
            if line.starts_with('\\') {
                // "\ No newline at end of file" markers consume nothing
                continue;
            }
            let hunk = patches
                .last_mut()
                .and_then(|patch| patch.hunks.last_mut())
                .ok_or_else(|| ParseError::DiffLine(line.to_string()))?;
            let desync = || ParseError::DiffLine(line.to_string());
            let (origin, content) = match line.as_bytes().first() {
                Some(b' ') => (LineOrigin::Context, &line[1..]),
                Some(b'+') => (LineOrigin::Addition, &line[1..]),
                Some(b'-') => (LineOrigin::Deletion, &line[1..]),
                _ => return Err(desync()),
            };
            match origin {
                LineOrigin::Context => {
                    old_left = old_left.checked_sub(1).ok_or_else(desync)?;
                    new_left = new_left.checked_sub(1).ok_or_else(desync)?;
                }
                LineOrigin::Addition => {
                    new_left = new_left.checked_sub(1).ok_or_else(desync)?;
                }
                LineOrigin::Deletion => {
                    old_left = old_left.checked_sub(1).ok_or_else(desync)?;
                }
            }
            hunk.lines.push(DiffLine {
                origin,
                content: content.to_string(),
            });
            continue;
        }

        if line.starts_with("diff --git ") {
            patches.push(FilePatch::empty());
            continue;
        }
        if line.starts_with('\\') {
            // trailing "\ No newline at end of file" after a closed hunk
            continue;
        }
        if let Some(rest) = line.strip_prefix("--- ") {
            let patch = current(&mut patches, line)?;
            patch.old_path = strip_side(rest, "a/");
            continue;
        }
        if let Some(rest) = line.strip_prefix("+++ ") {
            let patch = current(&mut patches, line)?;
            patch.new_path = strip_side(rest, "b/");
            continue;
        }
        if let Some(rest) = line.strip_prefix("rename from ") {
            current(&mut patches, line)?.old_path = Some(rest.to_string());
            continue;
        }
        if let Some(rest) = line.strip_prefix("rename to ") {
            current(&mut patches, line)?.new_path = Some(rest.to_string());
            continue;
        }
        if line.starts_with("@@ ") {
            let header = HunkHeader::parse(line)?;
            old_left = header.old_count;
            new_left = header.new_count;
            current(&mut patches, line)?.hunks.push(Hunk {
                header,
                lines: Vec::new(),
            });
            continue;
        }
        if line.starts_with("Binary files ") || line.starts_with("GIT binary patch") {
            current(&mut patches, line)?.binary = true;
            continue;
        }
        if is_header_noise(line) {
            continue;
        }
        return Err(ParseError::DiffLine(line.to_string()));
    }

    if old_left > 0 || new_left > 0 {
        return Err(ParseError::TruncatedDiff);
    }
    Ok(patches)
}

fn current<'a>(
    patches: &'a mut Vec<FilePatch>,
    line: &str,
) -> Result<&'a mut FilePatch, ParseError> {
    patches
        .last_mut()
        .ok_or_else(|| ParseError::DiffLine(line.to_string()))
}

/// `--- a/path` / `+++ b/path`, with `/dev/null` marking a missing side.
fn strip_side(rest: &str, prefix: &str) -> Option<String> {
    if rest == "/dev/null" {
        return None;
    }
    Some(rest.strip_prefix(prefix).unwrap_or(rest).to_string())
}

fn is_header_noise(line: &str) -> bool {
    line.starts_with("index ")
        || line.starts_with("old mode")
        || line.starts_with("new mode")
        || line.starts_with("new file mode")
        || line.starts_with("deleted file mode")
        || line.starts_with("similarity index")
        || line.starts_with("dissimilarity index")
        || line.starts_with("copy from ")
        || line.starts_with("copy to ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODIFY: &str = "\
diff --git a/src/lib.rs b/src/lib.rs
index 1111111..2222222 100644
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -1,3 +1,4 @@
 fn a() {}
-fn b() {}
+fn b(x: u32) {}
+fn c() {}
 fn d() {}
";

    #[test]
    fn parses_modification() {
        let patches = parse(MODIFY).unwrap();
        assert_eq!(patches.len(), 1);
        let patch = &patches[0];
        assert_eq!(patch.old_path.as_deref(), Some("src/lib.rs"));
        assert_eq!(patch.new_path.as_deref(), Some("src/lib.rs"));
        assert!(!patch.is_created());
        assert!(!patch.is_renamed());
        assert_eq!(patch.hunks.len(), 1);

        let hunk = &patch.hunks[0];
        assert_eq!(hunk.header.old_count, 3);
        assert_eq!(hunk.header.new_count, 4);
        let origins: Vec<LineOrigin> = hunk.lines.iter().map(|l| l.origin).collect();
        assert_eq!(
            origins,
            vec![
                LineOrigin::Context,
                LineOrigin::Deletion,
                LineOrigin::Addition,
                LineOrigin::Addition,
                LineOrigin::Context,
            ]
        );
        assert_eq!(hunk.lines[1].content, "fn b() {}");
    }

    #[test]
    fn parses_created_file() {
        let text = "\
diff --git a/new.txt b/new.txt
new file mode 100644
index 0000000..e69de29
--- /dev/null
+++ b/new.txt
@@ -0,0 +1,2 @@
+hello
+world
";
        let patches = parse(text).unwrap();
        let patch = &patches[0];
        assert!(patch.is_created());
        assert_eq!(patch.new_path.as_deref(), Some("new.txt"));
        assert_eq!(patch.hunks[0].header.old_count, 0);
        assert_eq!(patch.hunks[0].lines.len(), 2);
    }

    #[test]
    fn parses_deleted_file() {
        let text = "\
diff --git a/gone.txt b/gone.txt
deleted file mode 100644
index e69de29..0000000
--- a/gone.txt
+++ /dev/null
@@ -1,2 +0,0 @@
-hello
-world
";
        let patches = parse(text).unwrap();
        let patch = &patches[0];
        assert!(patch.is_deleted());
        assert_eq!(patch.old_path.as_deref(), Some("gone.txt"));
        assert_eq!(patch.hunks[0].header.new_count, 0);
    }

    #[test]
    fn parses_rename_with_change() {
        let text = "\
diff --git a/old.rs b/new.rs
similarity index 90%
rename from old.rs
rename to new.rs
index 1111111..2222222 100644
--- a/old.rs
+++ b/new.rs
@@ -1,2 +1,2 @@
 keep
-drop
+swap
";
        let patches = parse(text).unwrap();
        let patch = &patches[0];
        assert!(patch.is_renamed());
        assert_eq!(patch.old_path.as_deref(), Some("old.rs"));
        assert_eq!(patch.new_path.as_deref(), Some("new.rs"));
    }

    #[test]
    fn pure_rename_has_no_hunks() {
        let text = "\
diff --git a/old.rs b/new.rs
similarity index 100%
rename from old.rs
rename to new.rs
";
        let patches = parse(text).unwrap();
        assert!(patches[0].is_renamed());
        assert!(patches[0].hunks.is_empty());
    }

    #[test]
    fn flags_binary_files() {
        let text = "\
diff --git a/x.bin b/x.bin
index 1111111..2222222 100644
Binary files a/x.bin and b/x.bin differ
";
        let patches = parse(text).unwrap();
        assert!(patches[0].binary);
        assert!(patches[0].hunks.is_empty());
    }

    #[test]
    fn skips_no_newline_marker() {
        let text = "\
diff --git a/f b/f
index 1111111..2222222 100644
--- a/f
+++ b/f
@@ -1 +1 @@
-old
\\ No newline at end of file
+new
\\ No newline at end of file
";
        let patches = parse(text).unwrap();
        assert_eq!(patches[0].hunks[0].lines.len(), 2);
    }

    #[test]
    fn rejects_body_garbage() {
        let text = "\
diff --git a/f b/f
index 1111111..2222222 100644
--- a/f
+++ b/f
@@ -1,2 +1,2 @@
 keep
garbage
";
        assert!(parse(text).is_err());
    }

    #[test]
    fn rejects_truncated_hunk() {
        let text = "\
diff --git a/f b/f
index 1111111..2222222 100644
--- a/f
+++ b/f
@@ -1,3 +1,3 @@
 one
";
        assert!(matches!(parse(text), Err(ParseError::TruncatedDiff)));
    }

    #[test]
    fn empty_diff_is_empty() {
        assert!(parse("").unwrap().is_empty());
    }
}
