//! Body → record: content flags become media elements.

use super::media::MediaKind;
use super::{CompileError, LinkCompiler};
use crate::log;
use crate::text::parse_block;
use std::path::{Path, PathBuf};

/// Marks a line whose remainder is a local media path.
pub const CONTENT_FLAG: &str = "!!Content!!:";

impl LinkCompiler<'_> {
    /// Replace every content flag with the rendered media element.
    ///
    /// Media are staged locally, or uploaded when `publish_remote` is set.
    /// On error the input is left as it was.
    pub fn compile_forward(
        &self,
        text: &str,
        project_id: &str,
        publish_remote: bool,
    ) -> Result<String, CompileError> {
        let mut text = text.to_owned();
        let mut count = 0;

        while text.contains(CONTENT_FLAG) {
            // the flag is matched case-insensitively here but replaced
            // exactly below; a mismatch is caught by the integrity check
            let raw = parse_block(&text, CONTENT_FLAG, "\n")
                .ok_or_else(|| CompileError::CompileIntegrity(CONTENT_FLAG.to_owned()))?
                .to_owned();

            let path = clean_path(&raw);
            let path = path.as_str();
            let kind = MediaKind::from_path(Path::new(path)).ok_or_else(|| {
                CompileError::UnsupportedMediaType {
                    extension: extension_of(path),
                    path: path.to_owned(),
                }
            })?;

            let reference = self
                .migrate(Path::new(path), project_id, publish_remote)
                .ok_or_else(|| CompileError::MissingContent(path.to_owned()))?;

            let flagged = format!("{CONTENT_FLAG}{raw}");
            if !text.contains(&flagged) {
                return Err(CompileError::CompileIntegrity(format!(
                    "`{flagged}` vanished from the body"
                )));
            }
            text = text.replacen(&flagged, &kind.render(&reference), 1);
            count += 1;
        }

        if count > 0 {
            log!("compile"; "{count} media references in {project_id}");
        }
        Ok(text)
    }
}

/// Local paths named by the content flags of `text`, in order.
pub fn flagged_paths(text: &str) -> Vec<PathBuf> {
    text.match_indices(CONTENT_FLAG)
        .map(|(at, _)| {
            let rest = &text[at + CONTENT_FLAG.len()..];
            let raw = rest.split('\n').next().unwrap_or_default();
            PathBuf::from(clean_path(raw))
        })
        .collect()
}

/// A flagged path without quotes or surrounding whitespace.
fn clean_path(raw: &str) -> String {
    raw.replace('"', "").trim().to_owned()
}

/// Lowercase last extension, or empty.
fn extension_of(path: &str) -> String {
    Path::new(path)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::StagingDir;
    use crate::storage::{BlobStore, LocalStore};
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, LocalStore) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("photo.png"), b"png").unwrap();
        fs::write(dir.path().join("clip.MP4"), b"mp4").unwrap();
        let store = LocalStore::new(&dir.path().join("bucket"), "b", "us-east-2");
        (dir, store)
    }

    fn staging(dir: &TempDir) -> StagingDir {
        StagingDir::new(dir.path().join("projects/temp"))
    }

    #[test]
    fn test_forward_local() {
        let (dir, store) = setup();
        let compiler = LinkCompiler::new(&store, staging(&dir));
        let body = format!(
            "<p>Look:</p>\n!!Content!!:\"{}\"\n<p>end</p>",
            dir.path().join("photo.png").display()
        );

        let out = compiler.compile_forward(&body, "cobot", false).unwrap();
        assert_eq!(out, "<p>Look:</p>\n<img src='temp/photo.png'>\n<p>end</p>");
        assert!(dir.path().join("projects/temp/photo.png").exists());
    }

    #[test]
    fn test_forward_remote_video_at_end_of_text() {
        let (dir, store) = setup();
        let compiler = LinkCompiler::new(&store, staging(&dir));
        let body = format!("!!Content!!:{}", dir.path().join("clip.MP4").display());

        let out = compiler.compile_forward(&body, "cobot", true).unwrap();
        assert_eq!(
            out,
            "<video controls><source src='https://b.s3.us-east-2.amazonaws.com/content/cobot/clip.MP4' \
             type='video/mp4'>Your browser does not support the video tag.</video>"
        );
        assert_eq!(store.list_directory("content/cobot").unwrap(), vec!["content/cobot/clip.MP4"]);
    }

    #[test]
    fn test_forward_multiple_flags() {
        let (dir, store) = setup();
        let compiler = LinkCompiler::new(&store, staging(&dir));
        let photo = dir.path().join("photo.png");
        let body = format!("!!Content!!:{0}\n!!Content!!:{0}\n", photo.display());

        let out = compiler.compile_forward(&body, "p", false).unwrap();
        assert_eq!(out, "<img src='temp/photo.png'>\n<img src='temp/photo.png'>\n");
    }

    #[test]
    fn test_forward_without_flags_is_identity() {
        let (dir, store) = setup();
        let compiler = LinkCompiler::new(&store, staging(&dir));
        assert_eq!(compiler.compile_forward("<p>plain</p>", "p", false).unwrap(), "<p>plain</p>");
    }

    #[test]
    fn test_forward_unsupported_media() {
        let (dir, store) = setup();
        let compiler = LinkCompiler::new(&store, staging(&dir));
        let body = "<p>a</p>\n!!Content!!:notes.TXT\n";

        let err = compiler.compile_forward(body, "p", false).unwrap_err();
        match err {
            CompileError::UnsupportedMediaType { extension, path } => {
                assert_eq!(extension, "txt");
                assert_eq!(path, "notes.TXT");
            }
            other => panic!("unexpected error {other:?}"),
        }
        // nothing was staged
        assert!(!dir.path().join("projects/temp").exists());
    }

    #[test]
    fn test_forward_missing_content() {
        let (dir, store) = setup();
        let compiler = LinkCompiler::new(&store, staging(&dir));
        let body = format!("!!Content!!:{}\n", dir.path().join("gone.png").display());

        assert!(matches!(
            compiler.compile_forward(&body, "p", false),
            Err(CompileError::MissingContent(_))
        ));
    }

    #[test]
    fn test_forward_integrity_check() {
        let (dir, store) = setup();
        fs::write(dir.path().join("a.png"), b"a").unwrap();
        let compiler = LinkCompiler::new(&store, staging(&dir));
        // the lowercase flag is located first but is not an exact flag
        let body = format!(
            "!!content!!:{}\n!!Content!!:{}\n",
            dir.path().join("a.png").display(),
            dir.path().join("photo.png").display()
        );

        assert!(matches!(
            compiler.compile_forward(&body, "p", false),
            Err(CompileError::CompileIntegrity(_))
        ));
    }

    #[test]
    fn test_flagged_paths() {
        let body = "<p>a</p>\n!!Content!!:\" /m/a.png \"\n<p>b</p> !!Content!!:/m/b.mp4";
        assert_eq!(
            flagged_paths(body),
            vec![PathBuf::from("/m/a.png"), PathBuf::from("/m/b.mp4")]
        );
        assert!(flagged_paths("<p>none</p>").is_empty());
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("a/b.tar.GZ"), "gz");
        assert_eq!(extension_of("noext"), "");
    }
}
